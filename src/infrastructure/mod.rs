pub mod catalog;
pub mod pages;
pub mod storage;
