//! Playback loop policies evaluated on every player tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest stretch, in seconds, played at each end of a segment in
/// [`PlaybackMode::LoopSegmentStartEnd`].
const MAX_EDGE_SECONDS: f64 = 3.0;

/// How playback behaves relative to the segment under the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Play straight through.
    #[default]
    Normal,
    /// Loop only the first and last few seconds of the segment.
    LoopSegmentStartEnd,
    /// Loop the whole segment.
    LoopSegment,
    /// Stop at the segment end.
    PlaySegmentOnce,
    /// Advance through the selected segments.
    LoopSelectedSegments,
}

impl PlaybackMode {
    /// All modes in toggle order.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::LoopSegmentStartEnd,
        Self::LoopSegment,
        Self::PlaySegmentOnce,
        Self::LoopSelectedSegments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LoopSegmentStartEnd => "loop-segment-start-end",
            Self::LoopSegment => "loop-segment",
            Self::PlaySegmentOnce => "play-segment-once",
            Self::LoopSelectedSegments => "loop-selected-segments",
        }
    }

    /// Map a mode name to a mode. Unrecognized names play normally.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .unwrap_or_default()
    }

    /// The next mode in toggle order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved bounds of the segment being played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayingSegment {
    pub start: f64,
    pub end: f64,
}

/// What the player should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackAction {
    pub seek_to: Option<f64>,
    /// Stop playback.
    pub exit: bool,
    /// Move on to the next selected segment.
    pub next_segment: bool,
}

impl PlaybackAction {
    fn seek(to: f64) -> Self {
        Self {
            seek_to: Some(to),
            ..Self::default()
        }
    }

    /// True if nothing needs to happen.
    pub fn is_none(&self) -> bool {
        self.seek_to.is_none() && !self.exit && !self.next_segment
    }
}

/// Decide the player action for `current_time` inside `segment`.
pub fn play_only_current_segment(
    mode: PlaybackMode,
    current_time: f64,
    segment: PlayingSegment,
) -> PlaybackAction {
    let past_end = current_time >= segment.end;

    match mode {
        PlaybackMode::LoopSegmentStartEnd => {
            let window = MAX_EDGE_SECONDS.min((segment.end - segment.start) / 3.0) * 2.0;
            let half = window / 2.0;

            if current_time >= segment.start + half && current_time < segment.end - half {
                return PlaybackAction::seek(segment.end - half);
            }
            if past_end {
                return PlaybackAction::seek(segment.start);
            }
            PlaybackAction::default()
        }
        PlaybackMode::LoopSegment if past_end => PlaybackAction::seek(segment.start),
        PlaybackMode::PlaySegmentOnce if past_end => PlaybackAction {
            seek_to: Some(segment.end),
            exit: true,
            next_segment: false,
        },
        PlaybackMode::LoopSelectedSegments if past_end => PlaybackAction {
            next_segment: true,
            ..PlaybackAction::default()
        },
        _ => PlaybackAction::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEG: PlayingSegment = PlayingSegment {
        start: 10.0,
        end: 30.0,
    };

    #[test]
    fn test_loop_segment() {
        let mode = PlaybackMode::LoopSegment;
        assert!(play_only_current_segment(mode, 15.0, SEG).is_none());
        assert_eq!(
            play_only_current_segment(mode, 30.0, SEG).seek_to,
            Some(10.0)
        );
    }

    #[test]
    fn test_play_once_exits() {
        let action = play_only_current_segment(PlaybackMode::PlaySegmentOnce, 31.0, SEG);
        assert_eq!(action.seek_to, Some(30.0));
        assert!(action.exit);
    }

    #[test]
    fn test_loop_selected_advances() {
        let action = play_only_current_segment(PlaybackMode::LoopSelectedSegments, 30.0, SEG);
        assert!(action.next_segment);
        assert_eq!(action.seek_to, None);
        assert!(
            play_only_current_segment(PlaybackMode::LoopSelectedSegments, 29.0, SEG).is_none()
        );
    }

    #[test]
    fn test_start_end_skips_middle() {
        let mode = PlaybackMode::LoopSegmentStartEnd;
        // 20s segment: 3s played at each edge
        assert!(play_only_current_segment(mode, 12.0, SEG).is_none());
        assert_eq!(play_only_current_segment(mode, 13.0, SEG).seek_to, Some(27.0));
        assert!(play_only_current_segment(mode, 28.0, SEG).is_none());
        assert_eq!(play_only_current_segment(mode, 30.0, SEG).seek_to, Some(10.0));
    }

    #[test]
    fn test_start_end_short_segment_window() {
        let short = PlayingSegment {
            start: 0.0,
            end: 3.0,
        };
        // window per side is a third of the segment
        let action = play_only_current_segment(PlaybackMode::LoopSegmentStartEnd, 1.5, short);
        assert_eq!(action.seek_to, Some(2.0));
    }

    #[test]
    fn test_normal_is_noop() {
        assert!(play_only_current_segment(PlaybackMode::Normal, 100.0, SEG).is_none());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(
            PlaybackMode::from_name("loop-segment-start-end"),
            PlaybackMode::LoopSegmentStartEnd
        );
        assert_eq!(PlaybackMode::from_name("bogus"), PlaybackMode::Normal);
        assert_eq!(
            PlaybackMode::LoopSelectedSegments.next(),
            PlaybackMode::Normal
        );
    }
}
