pub mod ats;
pub mod resume;
