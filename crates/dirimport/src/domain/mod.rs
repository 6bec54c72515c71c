//! Core domain types: directory entries, import requests, and their errors.

pub mod errors;
pub mod model;
