pub mod school;
