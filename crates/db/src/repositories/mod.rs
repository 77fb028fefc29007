pub mod school_repo;

pub use school_repo::SchoolRepo;
