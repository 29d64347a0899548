//! Assignee selection for detected bugs.
//!
//! Given a "last author" hint, return it when it names a known team member;
//! otherwise pick uniformly at random from the fixed demo pool.

use rand::Rng;

pub const CANDIDATES: [&str; 4] = ["sarah-chen", "marcus-j", "elena-r", "david-kim"];

pub fn select(last_author: Option<&str>) -> String {
    if let Some(author) = last_author {
        if CANDIDATES.contains(&author) {
            return author.to_string();
        }
    }
    let idx = rand::thread_rng().gen_range(0..CANDIDATES.len());
    CANDIDATES[idx].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_hint_is_returned() {
        assert_eq!(select(Some("elena-r")), "elena-r");
    }

    #[test]
    fn unknown_hint_falls_back_to_pool() {
        let picked = select(Some("drive-by-committer"));
        assert!(CANDIDATES.contains(&picked.as_str()));
    }

    #[test]
    fn no_hint_picks_from_pool() {
        let picked = select(None);
        assert!(CANDIDATES.contains(&picked.as_str()));
    }
}
