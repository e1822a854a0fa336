use crate::{
    auth::{Claims, Role},
    errors::{AppError, AppResult},
};

pub fn require_staff(claims: &Claims) -> AppResult<()> {
    if !claims.role.is_staff() {
        return Err(AppError::Forbidden(
            "Only instructors and admins can view class progress".to_string(),
        ));
    }
    Ok(())
}

pub fn require_student(claims: &Claims) -> AppResult<()> {
    if claims.role != Role::Student {
        return Err(AppError::Forbidden(
            "Only students have personal progress".to_string(),
        ));
    }
    Ok(())
}

/// Admins see every class; instructors only the classes in their token.
pub fn require_class_access(claims: &Claims, class_id: &str) -> AppResult<()> {
    require_staff(claims)?;
    if claims.role != Role::Admin && !claims.class_ids.iter().any(|c| c == class_id) {
        return Err(AppError::Forbidden(format!(
            "You do not teach class '{}'",
            class_id
        )));
    }
    Ok(())
}

/// Class a staff request refers to: the explicit one, else the instructor's only class.
pub fn resolve_class_id(claims: &Claims, requested: Option<&str>) -> AppResult<String> {
    require_staff(claims)?;
    let class_id = match requested {
        Some(class_id) => class_id.to_string(),
        None => match claims.class_ids.as_slice() {
            [only] => only.clone(),
            [] => {
                return Err(AppError::ValidationError(
                    "classId is required".to_string(),
                ))
            }
            _ => {
                return Err(AppError::ValidationError(
                    "classId is required when teaching more than one class".to_string(),
                ))
            }
        },
    };
    require_class_access(claims, &class_id)?;
    Ok(class_id)
}

/// Students may only read their own records; staff may read anyone's.
pub fn require_self_or_staff(claims: &Claims, student_id: &str) -> AppResult<()> {
    if !claims.role.is_staff() && claims.sub != student_id {
        return Err(AppError::Forbidden(
            "You can only access your own progress".to_string(),
        ));
    }
    Ok(())
}
