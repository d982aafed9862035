pub mod unique_helpers;
