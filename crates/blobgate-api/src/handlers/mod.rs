//! Request handlers for the blobgate API

pub mod blobs;
