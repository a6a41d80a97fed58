//! Regex-driven act/chapter/scene segmentation of a single-file manuscript.

mod splitter;

pub use splitter::{
	Act, Chapter, Level, ManuscriptStructure, Scene, SplitError, SplitPatterns, split_manuscript,
};
