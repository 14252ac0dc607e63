//! Sliding-window pre-processor (§4.1): splits an overlong conversation into
//! overlapping windows bounded by a character-count proxy for token count,
//! each scanned independently; callers take the union/max across windows.

use guardrail_core::{Message, MessageWindow};

/// Characters of trailing context carried from one window into the next, so
/// a scanner pattern spanning the boundary is not silently missed.
const WINDOW_OVERLAP_CHARS: usize = 256;

/// Split `messages` into one or more [`MessageWindow`]s, each no larger than
/// `max_context_chars` (character-count proxy for the spec's token budget).
/// A single message larger than the budget still gets its own window rather
/// than being split mid-message — scanners operate on whole messages.
pub fn split_into_windows(messages: &[Message], max_context_chars: usize) -> Vec<MessageWindow> {
    if messages.is_empty() {
        return vec![MessageWindow {
            messages: Vec::new(),
            index: 0,
        }];
    }

    let total_chars: usize = messages.iter().map(|m| m.as_text().chars().count()).sum();
    if total_chars <= max_context_chars {
        return vec![MessageWindow {
            messages: messages.to_vec(),
            index: 0,
        }];
    }

    let mut windows = Vec::new();
    let mut current: Vec<Message> = Vec::new();
    let mut current_chars = 0usize;
    let mut index = 0usize;

    for msg in messages {
        let msg_chars = msg.as_text().chars().count();
        if current_chars + msg_chars > max_context_chars && !current.is_empty() {
            windows.push(MessageWindow {
                messages: current.clone(),
                index,
            });
            index += 1;
            current = overlap_tail(&current);
            current_chars = current.iter().map(|m| m.as_text().chars().count()).sum();
        }
        current.push(msg.clone());
        current_chars += msg_chars;
    }

    if !current.is_empty() {
        windows.push(MessageWindow {
            messages: current,
            index,
        });
    }

    windows
}

fn overlap_tail(messages: &[Message]) -> Vec<Message> {
    let mut tail = Vec::new();
    let mut tail_chars = 0usize;
    for msg in messages.iter().rev() {
        let chars = msg.as_text().chars().count();
        if tail_chars + chars > WINDOW_OVERLAP_CHARS && !tail.is_empty() {
            break;
        }
        tail.push(msg.clone());
        tail_chars += chars;
    }
    tail.reverse();
    tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_core::Role;

    #[test]
    fn fits_in_single_window() {
        let messages = vec![Message::new(Role::User, "hello")];
        let windows = split_into_windows(&messages, 1000);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].index, 0);
    }

    #[test]
    fn splits_overlong_conversation() {
        let messages: Vec<Message> = (0..10)
            .map(|i| Message::new(Role::User, "x".repeat(50) + &i.to_string()))
            .collect();
        let windows = split_into_windows(&messages, 120);
        assert!(windows.len() > 1);
        for w in &windows {
            let chars: usize = w.messages.iter().map(|m| m.as_text().chars().count()).sum();
            assert!(chars > 0);
        }
    }

    #[test]
    fn empty_conversation_yields_one_empty_window() {
        let windows = split_into_windows(&[], 1000);
        assert_eq!(windows.len(), 1);
        assert!(windows[0].messages.is_empty());
    }
}
