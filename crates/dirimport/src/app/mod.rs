//! Application layer: the entry list, the submission workflow, and the controller seam.

pub mod controller;
pub mod entries;
pub mod submission;
