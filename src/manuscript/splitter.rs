use std::fmt;

use log::debug;
use regex::{Regex, RegexBuilder};

/// Structural level a pattern splits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
	/// Top level, e.g. "Part 1".
	Act,
	/// Chapter headings inside an act.
	Chapter,
	/// Scene breaks inside a chapter.
	Scene,
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Level::Act => "act",
			Level::Chapter => "chapter",
			Level::Scene => "scene",
		})
	}
}

/// Why a manuscript could not be split.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
	/// The pattern is not a valid regex.
	#[error("invalid {level} pattern `{pattern}`: {source}")]
	InvalidPattern {
		/// Level the pattern was given for.
		level: Level,
		/// The pattern as entered.
		pattern: String,
		/// Parser error.
		#[source]
		source: regex::Error,
	},
	/// The pattern matches the empty string and would split everywhere.
	#[error("{level} pattern `{pattern}` matches empty text")]
	EmptyMatch {
		/// Level the pattern was given for.
		level: Level,
		/// The pattern as entered.
		pattern: String,
	},
}

/// Heading patterns, matched line by line (`^` and `$` anchor at line breaks).
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPatterns {
	/// Act heading pattern.
	pub act: String,
	/// Chapter heading pattern.
	pub chapter: String,
	/// Scene break pattern.
	pub scene: String,
}

impl Default for SplitPatterns {
	fn default() -> Self {
		Self {
			act: r"^Part\s+[0-9]+".into(),
			chapter: r"^Chapter\s+[0-9]+".into(),
			scene: r"^\*\*\*".into(),
		}
	}
}

/// Text between two scene breaks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	/// `scene-<act>-<chapter>-<scene>`.
	pub id: String,
	/// "Scene N".
	pub title: String,
	/// Trimmed scene text.
	pub content: String,
	/// Whitespace-separated words in `content`.
	pub word_count: usize,
}

/// A chapter and its scenes.
#[derive(Clone, Debug, PartialEq)]
pub struct Chapter {
	/// `chapter-<act>-<chapter>`.
	pub id: String,
	/// The heading that opened the chapter, or "Untitled Chapter".
	pub title: String,
	/// 1-based position within its act.
	pub order: usize,
	/// Scenes in reading order.
	pub scenes: Vec<Scene>,
	/// Sum over the scenes.
	pub word_count: usize,
}

/// An act and its chapters.
#[derive(Clone, Debug, PartialEq)]
pub struct Act {
	/// `act-<act>`.
	pub id: String,
	/// The heading that opened the act, "Prologue" or "Manuscript".
	pub title: String,
	/// Chapters in reading order.
	pub chapters: Vec<Chapter>,
	/// Sum over the chapters.
	pub word_count: usize,
}

/// Result of [`split_manuscript`].
#[derive(Clone, Debug, PartialEq)]
pub struct ManuscriptStructure {
	/// Acts in reading order.
	pub acts: Vec<Act>,
	/// Sum over the acts.
	pub total_words: usize,
	/// Patterns the structure was split with.
	pub patterns: SplitPatterns,
}

impl ManuscriptStructure {
	/// Chapters across all acts.
	pub fn chapter_count(&self) -> usize {
		self.acts.iter().map(|a| a.chapters.len()).sum()
	}

	/// Scenes across all chapters.
	pub fn scene_count(&self) -> usize {
		self.acts
			.iter()
			.flat_map(|a| &a.chapters)
			.map(|c| c.scenes.len())
			.sum()
	}

	/// Retitles every chapter "Chapter N", numbering straight through the acts.
	pub fn renumber_chapters(&mut self) {
		for (n, chapter) in self
			.acts
			.iter_mut()
			.flat_map(|a| a.chapters.iter_mut())
			.enumerate()
		{
			chapter.title = format!("Chapter {}", n + 1);
		}
	}
}

fn compile(level: Level, pattern: &str) -> Result<Regex, SplitError> {
	let re = RegexBuilder::new(pattern)
		.multi_line(true)
		.build()
		.map_err(|source| SplitError::InvalidPattern {
			level,
			pattern: pattern.to_owned(),
			source,
		})?;
	if re.is_match("") {
		return Err(SplitError::EmptyMatch {
			level,
			pattern: pattern.to_owned(),
		});
	}
	Ok(re)
}

/// Splits `text` at every match of `re`. The first section is the text before
/// the first match and has no heading; every later one is headed by the match
/// that opens it.
fn sections<'t>(re: &Regex, text: &'t str) -> Vec<(Option<&'t str>, &'t str)> {
	let mut out = Vec::new();
	let mut heading = None;
	let mut start = 0;
	for m in re.find_iter(text) {
		out.push((heading, &text[start..m.start()]));
		heading = Some(m.as_str());
		start = m.end();
	}
	out.push((heading, &text[start..]));
	out
}

fn split_scenes(re: &Regex, text: &str, prefix: &str) -> Vec<Scene> {
	re.split(text)
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.enumerate()
		.map(|(i, content)| Scene {
			id: format!("scene-{}-{}", prefix, i + 1),
			title: format!("Scene {}", i + 1),
			content: content.to_owned(),
			word_count: content.split_whitespace().count(),
		})
		.collect()
}

fn split_chapters(chapter_re: &Regex, scene_re: &Regex, text: &str, act_no: usize) -> Vec<Chapter> {
	let sections = sections(chapter_re, text);
	let has_headings = sections.len() > 1;
	let mut chapters = Vec::new();

	for (heading, body) in sections {
		if heading.is_none() && has_headings && body.trim().is_empty() {
			continue;
		}
		let order = chapters.len() + 1;
		let prefix = format!("{}-{}", act_no, order);
		let scenes = split_scenes(scene_re, body, &prefix);
		if scenes.is_empty() {
			continue;
		}
		chapters.push(Chapter {
			id: format!("chapter-{}", prefix),
			title: heading.unwrap_or("Untitled Chapter").to_owned(),
			order,
			word_count: scenes.iter().map(|s| s.word_count).sum(),
			scenes,
		});
	}
	chapters
}

/// Splits a manuscript into acts, chapters and scenes.
///
/// Text before the first act heading becomes a "Prologue" act, or a single
/// "Manuscript" act when there are no act headings at all. Blank scenes are
/// dropped, and so are chapters and acts that end up empty.
pub fn split_manuscript(text: &str, patterns: &SplitPatterns) -> Result<ManuscriptStructure, SplitError> {
	let act_re = compile(Level::Act, &patterns.act)?;
	let chapter_re = compile(Level::Chapter, &patterns.chapter)?;
	let scene_re = compile(Level::Scene, &patterns.scene)?;

	let sections = sections(&act_re, text);
	let leading_title = if sections.len() > 1 {
		"Prologue"
	} else {
		"Manuscript"
	};
	let mut acts = Vec::new();

	for (heading, body) in sections {
		if heading.is_none() && body.trim().is_empty() {
			continue;
		}
		let act_no = acts.len() + 1;
		let chapters = split_chapters(&chapter_re, &scene_re, body, act_no);
		if chapters.is_empty() {
			continue;
		}
		acts.push(Act {
			id: format!("act-{}", act_no),
			title: heading.unwrap_or(leading_title).to_owned(),
			word_count: chapters.iter().map(|c| c.word_count).sum(),
			chapters,
		});
	}

	let structure = ManuscriptStructure {
		total_words: acts.iter().map(|a| a.word_count).sum(),
		acts,
		patterns: patterns.clone(),
	};
	debug!(
		"manuscript split into {} acts, {} chapters, {} words",
		structure.acts.len(),
		structure.chapter_count(),
		structure.total_words
	);
	Ok(structure)
}
