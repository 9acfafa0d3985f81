//! Splitting article paragraphs into slide-sized bullet groups.
//!
//! Sentences are approximated by splitting on `". "`; the period is not
//! put back on the fragment. Each paragraph contributes at most
//! `bullets_per_slide` fragments, and the fragments of consecutive
//! paragraphs are regrouped into fixed-size windows, one per slide.

use crate::types::SlidePlan;

/// Separator used to approximate sentence boundaries.
const SENTENCE_SEPARATOR: &str = ". ";

/// Groups paragraph sentences into slides.
#[derive(Debug, Clone)]
pub struct Segmenter {
    /// Maximum number of slides produced.
    max_slides: usize,

    /// Number of sentence fragments per slide.
    bullets_per_slide: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            max_slides: 12,
            bullets_per_slide: 3,
        }
    }
}

impl Segmenter {
    /// Create a segmenter with 12 slides of 3 bullets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of slides.
    pub fn with_max_slides(mut self, max_slides: usize) -> Self {
        self.max_slides = max_slides;
        self
    }

    /// Set the number of bullets per slide.
    pub fn with_bullets_per_slide(mut self, bullets: usize) -> Self {
        self.bullets_per_slide = bullets.max(1); // At least 1 bullet per slide
        self
    }

    /// Condense paragraphs into bullet groups.
    ///
    /// Takes the first sentences of each paragraph until enough fragments
    /// for `max_slides` full slides are collected, then regroups them.
    pub fn condense(&self, paragraphs: &[String]) -> Vec<Vec<String>> {
        let capacity = self.max_slides * self.bullets_per_slide;
        let mut fragments: Vec<String> = Vec::new();

        for paragraph in paragraphs {
            fragments.extend(self.leading_sentences(paragraph));
            if fragments.len() >= capacity {
                break;
            }
        }

        fragments
            .chunks(self.bullets_per_slide)
            .take(self.max_slides)
            .map(<[String]>::to_vec)
            .collect()
    }

    /// Derive titles and bullet groups in one pass.
    ///
    /// Slide `i` gets the bullets of window `i` and the title of paragraph
    /// `i`. A window can only fill once its paragraph has been read, so
    /// every slide has a title; titles of trailing paragraphs that never
    /// start a window are dropped.
    pub fn plan(&self, paragraphs: &[String]) -> Vec<SlidePlan> {
        let capacity = self.max_slides * self.bullets_per_slide;
        let mut titles: Vec<&str> = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut collected = 0;
        let mut plans: Vec<SlidePlan> = Vec::new();

        for paragraph in paragraphs {
            titles.push(derive_title(paragraph));

            for fragment in self.leading_sentences(paragraph) {
                pending.push(fragment);
                collected += 1;
                if pending.len() == self.bullets_per_slide {
                    let title = titles[plans.len()];
                    plans.push(SlidePlan::new(title, std::mem::take(&mut pending)));
                }
            }

            if collected >= capacity {
                break;
            }
        }

        if !pending.is_empty() {
            let title = titles[plans.len()];
            plans.push(SlidePlan::new(title, pending));
        }

        plans.truncate(self.max_slides);
        log::debug!(
            "Planned {} slides from {} paragraphs",
            plans.len(),
            paragraphs.len()
        );
        plans
    }

    /// The first `bullets_per_slide` sentence fragments of a paragraph.
    fn leading_sentences<'a>(&'a self, paragraph: &'a str) -> impl Iterator<Item = String> + 'a {
        paragraph
            .split(SENTENCE_SEPARATOR)
            .take(self.bullets_per_slide)
            .map(str::to_string)
    }
}

/// Title for a paragraph: the text before its first period.
pub fn derive_title(paragraph: &str) -> &str {
    paragraph.split('.').next().unwrap_or(paragraph)
}

/// Titles for every paragraph, in order.
pub fn derive_titles(paragraphs: &[String]) -> Vec<&str> {
    paragraphs.iter().map(|p| derive_title(p)).collect()
}
