// Row/table model and the cross-source join
pub mod types;   // Cell, Row, Table, IdentityKey
pub mod merger;  // outer join with first-source-wins column resolution

pub use merger::{merge, merge_with, ExactMatch, KeyMatcher, MergeError, MergedTable};
pub use types::{Cell, IdentityKey, Row, Table, CLUB_NAME, PLAYER_NAME};
