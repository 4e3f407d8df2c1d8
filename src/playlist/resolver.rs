// ==========================================
// NEXT-ITEM RESOLVER
// ==========================================
// Decides what plays after the current item finishes.
//
// Inputs:
// - the ordered list of items (order defines "next")
// - the id of the item that just finished (or None)
// - the playback mode (repeat one / auto next)
//
// Output: the id to play next, or None meaning "stop".
//
// Everything here is a pure function:
// - no I/O, no logging, no state between calls
// - the same arguments always give the same answer
// - malformed input (empty list, non-array JSON) resolves to "stop"
//   instead of an error, because the caller is a playback-ended handler
//   that has nothing useful to do with an error
//
// Precedence (this order is the contract):
// 1. empty list             -> stop
// 2. repeat one             -> current id, or the first id if nothing is current
// 3. auto next off          -> stop
// 4. current id not in list -> first id
// 5. current is not last    -> the following id
// 6. current is last        -> stop (no wraparound)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything with a stable string id can be resolved over
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

// ==========================================
// PLAYBACK MODE (the two checkboxes)
// ==========================================
// The UI keeps these mutually exclusive, but nothing stops a caller from
// passing both. ContinuationMode::from() applies the precedence once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackMode {
    pub repeat_one: bool,
    pub auto_next: bool,
}

impl PlaybackMode {
    pub fn new(repeat_one: bool, auto_next: bool) -> Self {
        PlaybackMode {
            repeat_one,
            auto_next,
        }
    }
}

/// What should happen when an item ends, with the flag precedence already applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationMode {
    Repeat,
    Advance,
    Stop,
}

impl From<PlaybackMode> for ContinuationMode {
    fn from(mode: PlaybackMode) -> Self {
        if mode.repeat_one {
            ContinuationMode::Repeat
        } else if mode.auto_next {
            ContinuationMode::Advance
        } else {
            ContinuationMode::Stop
        }
    }
}

/// Outcome of one resolver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation<'a> {
    /// Play the same item again
    RepeatCurrent(&'a str),
    /// Switch to another item (the next one, or the first one)
    AdvanceTo(&'a str),
    Stop,
}

impl<'a> Continuation<'a> {
    pub fn next_id(self) -> Option<&'a str> {
        match self {
            Continuation::RepeatCurrent(id) | Continuation::AdvanceTo(id) => Some(id),
            Continuation::Stop => None,
        }
    }
}

// ==========================================
// resolve()
// ==========================================
// Typed entry point. `list` is any slice of Identified items.
//
// Example:
// - list = [a, b, c], current = Some("a"), mode = Advance
// - returns AdvanceTo("b")
pub fn resolve<'a, T: Identified>(
    list: &'a [T],
    current_id: Option<&'a str>,
    mode: ContinuationMode,
) -> Continuation<'a> {
    resolve_by(list.len(), |i| list.get(i).map(Identified::id), current_id, mode)
}

/// The flag-pair form: `None` means stop
pub fn compute_next_id<'a, T: Identified>(
    list: &'a [T],
    current_id: Option<&'a str>,
    mode: PlaybackMode,
) -> Option<&'a str> {
    resolve(list, current_id, mode.into()).next_id()
}

// ==========================================
// compute_next_id_json()
// ==========================================
// Same rules over an untyped playlist straight from JSON.
//
// - anything that isn't an array is treated like an empty list
// - entries that aren't objects, or whose "id" isn't a string, never match
//   the current id
// - if the chosen entry has no string id the answer is "stop"
pub fn compute_next_id_json<'a>(
    list: &'a Value,
    current_id: Option<&'a str>,
    mode: PlaybackMode,
) -> Option<&'a str> {
    let entries = match list.as_array() {
        Some(entries) => entries,
        None => return None,
    };

    let id_at = |i: usize| entries.get(i).and_then(|v| v.get("id")).and_then(Value::as_str);
    resolve_by(entries.len(), id_at, current_id, mode.into()).next_id()
}

// Shared core. `id_at(i)` returns None for entries without a usable id.
fn resolve_by<'a, F>(
    len: usize,
    id_at: F,
    current_id: Option<&'a str>,
    mode: ContinuationMode,
) -> Continuation<'a>
where
    F: Fn(usize) -> Option<&'a str>,
{
    if len == 0 {
        return Continuation::Stop;
    }

    // First match wins when ids are duplicated
    let index = current_id.and_then(|current| (0..len).find(|&i| id_at(i) == Some(current)));

    match mode {
        ContinuationMode::Repeat => match current_id {
            Some(current) => Continuation::RepeatCurrent(current),
            None => id_at(0).map_or(Continuation::Stop, Continuation::AdvanceTo),
        },
        ContinuationMode::Stop => Continuation::Stop,
        ContinuationMode::Advance => {
            let target = match index {
                None => 0,
                Some(i) if i + 1 < len => i + 1,
                Some(_) => return Continuation::Stop,
            };
            id_at(target).map_or(Continuation::Stop, Continuation::AdvanceTo)
        }
    }
}
