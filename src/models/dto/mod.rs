pub mod request;
pub mod response;

pub use request::{ClassQuery, StudentQuery};
pub use response::{
    AssessmentHistoryResponse, AtRiskResponse, ClassProgressResponse, DashboardResponse,
    StudentProgressResponse,
};
