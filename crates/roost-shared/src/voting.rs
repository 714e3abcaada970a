//! Vote aggregation and the per-user toggle rule.
//!
//! The store applies the toggle atomically (one conditional operation keyed
//! by post and user), so a rapid double-submission cannot race itself into
//! duplicate rows. The same rule is exposed here as a pure function so the
//! client can update its local working set optimistically while the request
//! is in flight.

use uuid::Uuid;

use crate::models::Vote;

pub const UPVOTE: i32 = 1;
pub const DOWNVOTE: i32 = -1;

/// Like/dislike counts for one post, recomputed from the flat vote list on
/// every refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub likes: usize,
    pub dislikes: usize,
}

impl VoteTally {
    pub fn count(votes: &[Vote]) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            match vote.value {
                UPVOTE => tally.likes += 1,
                DOWNVOTE => tally.dislikes += 1,
                _ => {}
            }
        }
        tally
    }

    /// A vote button lights up only while the aggregate count for its
    /// direction is exactly one. Kept as computed upstream; "did the current
    /// user vote this way" is a different check and deliberately not what
    /// this answers.
    pub fn highlighted(&self, value: i32) -> bool {
        match value {
            UPVOTE => self.likes == 1,
            DOWNVOTE => self.dislikes == 1,
            _ => false,
        }
    }
}

/// What the toggle rule decides for one (post, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Insert { value: i32 },
    Remove { vote_id: i64 },
    Switch { vote_id: i64, value: i32 },
}

/// The toggle rule: no existing vote inserts, the same value again removes
/// (toggle-off), a different value switches.
pub fn resolve_toggle(existing: Option<&Vote>, requested: i32) -> VoteAction {
    match existing {
        None => VoteAction::Insert { value: requested },
        Some(vote) if vote.value == requested => VoteAction::Remove { vote_id: vote.id },
        Some(vote) => VoteAction::Switch {
            vote_id: vote.id,
            value: requested,
        },
    }
}

/// Apply the toggle rule to a local working set. Inserted rows carry id 0
/// until the next refresh replaces the set with stored rows.
pub fn apply_toggle(votes: &mut Vec<Vote>, post_id: i64, user_id: Uuid, requested: i32) {
    let position = votes
        .iter()
        .position(|v| v.post_id == post_id && v.user_id == user_id);

    let action = resolve_toggle(position.map(|i| &votes[i]), requested);
    match (action, position) {
        (VoteAction::Insert { value }, _) => votes.push(Vote {
            id: 0,
            post_id,
            user_id,
            value,
        }),
        (VoteAction::Remove { .. }, Some(i)) => {
            votes.remove(i);
        }
        (VoteAction::Switch { value, .. }, Some(i)) => votes[i].value = value,
        // Remove/Switch imply an existing row was found.
        (_, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: i64, user: Uuid, value: i32) -> Vote {
        Vote {
            id,
            post_id: 1,
            user_id: user,
            value,
        }
    }

    fn user(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn tally_counts_each_direction_in_one_pass() {
        let votes = vec![
            vote(1, user(1), UPVOTE),
            vote(2, user(2), UPVOTE),
            vote(3, user(3), DOWNVOTE),
        ];

        let tally = VoteTally::count(&votes);
        assert_eq!(tally.likes, 2);
        assert_eq!(tally.dislikes, 1);
        assert!(tally.likes + tally.dislikes <= votes.len());
    }

    #[test]
    fn tally_ignores_out_of_range_values() {
        let votes = vec![vote(1, user(1), UPVOTE), vote(2, user(2), 0)];

        let tally = VoteTally::count(&votes);
        assert_eq!(tally.likes, 1);
        assert_eq!(tally.dislikes, 0);
        assert!(tally.likes + tally.dislikes <= votes.len());
    }

    #[test]
    fn highlight_fires_only_at_count_one() {
        let two_likes = VoteTally::count(&[
            vote(1, user(1), UPVOTE),
            vote(2, user(2), UPVOTE),
            vote(3, user(3), DOWNVOTE),
        ]);
        assert!(!two_likes.highlighted(UPVOTE));
        assert!(two_likes.highlighted(DOWNVOTE));

        let one_like = VoteTally::count(&[vote(1, user(1), UPVOTE)]);
        assert!(one_like.highlighted(UPVOTE));
        assert!(!one_like.highlighted(DOWNVOTE));
    }

    #[test]
    fn resolve_inserts_when_no_vote_exists() {
        assert_eq!(
            resolve_toggle(None, UPVOTE),
            VoteAction::Insert { value: UPVOTE }
        );
    }

    #[test]
    fn resolve_removes_on_repeat_and_switches_on_flip() {
        let existing = vote(42, user(1), UPVOTE);
        assert_eq!(
            resolve_toggle(Some(&existing), UPVOTE),
            VoteAction::Remove { vote_id: 42 }
        );
        assert_eq!(
            resolve_toggle(Some(&existing), DOWNVOTE),
            VoteAction::Switch {
                vote_id: 42,
                value: DOWNVOTE
            }
        );
    }

    #[test]
    fn repeated_vote_toggles_off() {
        let voter = user(9);
        let mut votes = Vec::new();

        apply_toggle(&mut votes, 1, voter, UPVOTE);
        apply_toggle(&mut votes, 1, voter, UPVOTE);

        assert!(votes.iter().all(|v| v.user_id != voter));
        assert!(votes.is_empty());
    }

    #[test]
    fn flipped_vote_leaves_one_row_with_new_value() {
        let voter = user(9);
        let mut votes = Vec::new();

        apply_toggle(&mut votes, 1, voter, UPVOTE);
        apply_toggle(&mut votes, 1, voter, DOWNVOTE);

        let mine: Vec<&Vote> = votes.iter().filter(|v| v.user_id == voter).collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].value, DOWNVOTE);
    }

    #[test]
    fn toggle_only_touches_the_callers_vote() {
        let mut votes = vec![vote(1, user(1), UPVOTE), vote(2, user(2), DOWNVOTE)];

        apply_toggle(&mut votes, 1, user(1), UPVOTE);

        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].user_id, user(2));
    }
}
