//! Embedded built-in dictionaries.
//!
//! The source-of-truth lives in `aruco-card-aruco/data/*_CODES.json`, one
//! OpenCV-layout byte row per marker; `build.rs` repacks every file there into
//! a `Dictionary` constant.
//!
//! In `DICT_4X4_50`, ids 0 to 2 carry OpenCV's bytes for the dictionary of the
//! same name. Ids 3 to 49 are this crate's own codes until OpenCV's rows are
//! pasted into the data file.

#![allow(clippy::unreadable_literal, non_upper_case_globals)]

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));
