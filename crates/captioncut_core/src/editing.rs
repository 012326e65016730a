//! Structural edits over an ordered clip sequence.
//!
//! Every function here is pure: it takes the current sequence by reference
//! and returns a new one. Results that change the sequence's shape come back
//! with contiguous 1-based timeline labels.

use crate::error::{CoreError, Result};
use crate::types::*;
use std::collections::HashSet;

/// Rewrite timeline labels so the clip at position `i` is labelled `i + 1`.
pub fn renumber(clips: &mut [Clip]) {
    for (index, clip) in clips.iter_mut().enumerate() {
        clip.timeline = (index + 1).to_string();
    }
}

pub fn find_clip<'a>(clips: &'a [Clip], clip_id: &str) -> Option<&'a Clip> {
    clips.iter().find(|c| c.id == clip_id)
}

pub fn clip_position(clips: &[Clip], clip_id: &str) -> Option<usize> {
    clips.iter().position(|c| c.id == clip_id)
}

/// Drop the clip with `clip_id` and renumber. An unknown id removes nothing,
/// but the result is still renumbered.
pub fn remove_clip(clips: &[Clip], clip_id: &str) -> Vec<Clip> {
    let mut out: Vec<Clip> = clips.iter().filter(|c| c.id != clip_id).cloned().collect();
    renumber(&mut out);
    out
}

/// Clear the speaker of every clip attributed to `speaker`.
pub fn clear_speaker(clips: &[Clip], speaker: &str) -> Vec<Clip> {
    clips
        .iter()
        .map(|clip| {
            if clip.speaker == speaker {
                Clip {
                    speaker: String::new(),
                    ..clip.clone()
                }
            } else {
                clip.clone()
            }
        })
        .collect()
}

/// Attribute every clip in `clip_ids` to `speaker`.
pub fn assign_speaker(clips: &[Clip], clip_ids: &[String], speaker: &str) -> Vec<Clip> {
    let ids: HashSet<&str> = clip_ids.iter().map(String::as_str).collect();
    clips
        .iter()
        .map(|clip| {
            if ids.contains(clip.id.as_str()) {
                Clip {
                    speaker: speaker.to_string(),
                    ..clip.clone()
                }
            } else {
                clip.clone()
            }
        })
        .collect()
}

/// Move `source` onto `target`.
///
/// With more than one clip selected and `source` among them, the selected
/// clips travel together as one contiguous block in their current relative
/// order. Otherwise only `source` moves. Unknown ids leave the order as is.
pub fn reorder_clips(clips: &[Clip], source: &str, target: &str, selected: &[String]) -> Vec<Clip> {
    let (old_index, new_index) = match (clip_position(clips, source), clip_position(clips, target)) {
        (Some(o), Some(n)) => (o, n),
        _ => {
            let mut out = clips.to_vec();
            renumber(&mut out);
            return out;
        }
    };

    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();

    let mut out = if selected.len() > 1 && selected.contains(source) {
        let (block, rest): (Vec<Clip>, Vec<Clip>) = clips
            .iter()
            .cloned()
            .partition(|c| selected.contains(c.id.as_str()));

        let insert_at = if selected.contains(target) {
            clips[..new_index]
                .iter()
                .filter(|c| !selected.contains(c.id.as_str()))
                .count()
        } else {
            // target is unselected, so it is present in `rest`
            let target_in_rest = clip_position(&rest, target).unwrap_or(rest.len());
            if old_index < new_index {
                target_in_rest + 1
            } else {
                target_in_rest
            }
        };

        let mut out = Vec::with_capacity(clips.len());
        out.extend_from_slice(&rest[..insert_at]);
        out.extend(block);
        out.extend_from_slice(&rest[insert_at..]);
        out
    } else {
        let mut out = clips.to_vec();
        let moved = out.remove(old_index);
        out.insert(new_index, moved);
        out
    };

    renumber(&mut out);
    out
}

/// Split a clip's words in half (the first half takes the extra word) and
/// replace it with two clips carrying `ids`.
pub fn split_clip(clips: &[Clip], clip_id: &str, ids: (&str, &str)) -> Result<Vec<Clip>> {
    let index =
        clip_position(clips, clip_id).ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;
    let clip = &clips[index];

    if clip.words.len() < 2 {
        return Err(CoreError::InvalidOperation(format!(
            "clip \"{}\" needs at least 2 words to split",
            clip.subtitle
        )));
    }

    let mid = clip.words.len().div_ceil(2);
    let (left_words, right_words) = clip.words.split_at(mid);

    let first = split_half(clip, ids.0, left_words);
    let second = split_half(clip, ids.1, right_words);

    let mut out = clips.to_vec();
    out.splice(index..=index, [first, second]);
    renumber(&mut out);
    Ok(out)
}

fn split_half(original: &Clip, id: &str, words: &[Word]) -> Clip {
    let words = words
        .iter()
        .enumerate()
        .map(|(i, w)| Word {
            id: format!("{}_word_{}", id, i),
            ..w.clone()
        })
        .collect();
    Clip::from_words(id, original.speaker.clone(), words)
}

/// True when the clips named by `clip_ids` sit at adjacent positions.
/// Ids that are not in the sequence are ignored.
pub fn are_consecutive(clips: &[Clip], clip_ids: &[String]) -> bool {
    let mut indices: Vec<usize> = clip_ids
        .iter()
        .filter_map(|id| clip_position(clips, id))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices.windows(2).all(|w| w[1] == w[0] + 1)
}

/// Replace a consecutive run of clips with a single clip carrying `merged_id`.
///
/// The merged clip sits where the first selected clip was, keeps that clip's
/// speaker, and joins texts with a single space.
pub fn merge_clips(clips: &[Clip], clip_ids: &[String], merged_id: &str) -> Result<Vec<Clip>> {
    let ids: HashSet<&str> = clip_ids.iter().map(String::as_str).collect();
    let selected: Vec<(usize, &Clip)> = clips
        .iter()
        .enumerate()
        .filter(|(_, c)| ids.contains(c.id.as_str()))
        .collect();

    let first_index = match selected.first() {
        Some((i, _)) => *i,
        None => {
            return Err(CoreError::InvalidOperation("no clips selected to merge".into()));
        }
    };

    if !are_consecutive(clips, clip_ids) {
        return Err(CoreError::InvalidOperation(
            "clips to merge must be consecutive".into(),
        ));
    }

    let subtitle = selected
        .iter()
        .map(|(_, c)| c.subtitle.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let full_text = selected
        .iter()
        .map(|(_, c)| c.full_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let words: Vec<Word> = selected
        .iter()
        .enumerate()
        .flat_map(|(clip_index, (_, c))| {
            c.words.iter().enumerate().map(move |(word_index, w)| Word {
                id: format!("{}_word_{}_{}", merged_id, clip_index, word_index),
                ..w.clone()
            })
        })
        .collect();

    let first = selected[0].1;
    let last = selected[selected.len() - 1].1;
    let merged = Clip {
        id: merged_id.to_string(),
        timeline: first.timeline.clone(),
        speaker: first.speaker.clone(),
        subtitle,
        full_text,
        start_time: first.start_time.or_else(|| words.first().map(|w| w.start)),
        end_time: last.end_time.or_else(|| words.last().map(|w| w.end)),
        words,
    };

    let mut out: Vec<Clip> = clips
        .iter()
        .filter(|c| !ids.contains(c.id.as_str()))
        .cloned()
        .collect();
    out.insert(first_index, merged);
    renumber(&mut out);
    Ok(out)
}

/// Append `extra` after the existing clips and renumber.
pub fn append_clips(clips: &[Clip], extra: &[Clip]) -> Vec<Clip> {
    let mut out = Vec::with_capacity(clips.len() + extra.len());
    out.extend_from_slice(clips);
    out.extend_from_slice(extra);
    renumber(&mut out);
    out
}

/// Shortest span a retimed word is squeezed to.
const MIN_WORD_SECONDS: f64 = 0.1;

fn clip_index(clips: &[Clip], clip_id: &str) -> Result<usize> {
    clip_position(clips, clip_id).ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))
}

/// Replace one word's text and rebuild the clip's subtitle and full text.
pub fn update_word_text(
    clips: &[Clip],
    clip_id: &str,
    word_id: &str,
    text: &str,
) -> Result<Vec<Clip>> {
    let index = clip_index(clips, clip_id)?;
    let mut out = clips.to_vec();
    let clip = &mut out[index];

    let word = clip
        .words
        .iter_mut()
        .find(|w| w.id == word_id)
        .ok_or_else(|| {
            CoreError::InvalidOperation(format!("clip {} has no word {}", clip_id, word_id))
        })?;
    word.text = text.to_string();

    let joined = join_word_text(&clip.words);
    clip.subtitle = joined.clone();
    clip.full_text = joined;
    Ok(out)
}

/// Set a clip's subtitle and full text without touching its words.
pub fn update_clip_text(clips: &[Clip], clip_id: &str, text: &str) -> Result<Vec<Clip>> {
    let index = clip_index(clips, clip_id)?;
    let mut out = clips.to_vec();
    out[index].subtitle = text.to_string();
    out[index].full_text = text.to_string();
    Ok(out)
}

/// Move a clip to `[start, end]` seconds, scaling its words proportionally.
///
/// Each word keeps at least [`MIN_WORD_SECONDS`] and stays inside the new
/// range. A clip with no previous extent keeps its word times.
pub fn update_clip_timing(
    clips: &[Clip],
    clip_id: &str,
    start: f64,
    end: f64,
) -> Result<Vec<Clip>> {
    if end.partial_cmp(&start) != Some(std::cmp::Ordering::Greater) {
        return Err(CoreError::InvalidOperation(format!(
            "clip end {} must be after start {}",
            end, start
        )));
    }
    let index = clip_index(clips, clip_id)?;
    let mut out = clips.to_vec();
    let clip = &mut out[index];

    let old_start = clip
        .start_time
        .or_else(|| clip.words.first().map(|w| w.start))
        .unwrap_or(0.0);
    let old_end = clip
        .end_time
        .or_else(|| clip.words.last().map(|w| w.end))
        .unwrap_or(old_start);
    let old_span = old_end - old_start;
    let new_span = end - start;

    if old_span > 0.0 {
        for word in &mut clip.words {
            let word_start = start + (word.start - old_start) / old_span * new_span;
            let word_end = start + (word.end - old_start) / old_span * new_span;
            word.start = start.max((word_end - MIN_WORD_SECONDS).min(word_start));
            word.end = end.min((word_start + MIN_WORD_SECONDS).max(word_end));
        }
    }
    clip.start_time = Some(start);
    clip.end_time = Some(end);
    Ok(out)
}

/// Return the first duplicated clip id, if any.
pub fn first_duplicate_id(clips: &[Clip]) -> Option<&str> {
    let mut seen = HashSet::new();
    clips
        .iter()
        .map(|c| c.id.as_str())
        .find(|id| !seen.insert(*id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
