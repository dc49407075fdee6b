//! Follow Edge Entity
//!
//! Directed "follows" relationship. An edge is either present or absent;
//! it carries no metadata of its own.

use kernel::id::AccountId;

use crate::error::{SocialError, SocialResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    follower_id: AccountId,
    followee_id: AccountId,
}

impl FollowEdge {
    /// Build an edge, rejecting self-loops
    pub fn new(follower_id: AccountId, followee_id: AccountId) -> SocialResult<Self> {
        if follower_id == followee_id {
            return Err(SocialError::SelfFollow);
        }
        Ok(Self {
            follower_id,
            followee_id,
        })
    }

    pub fn follower_id(&self) -> AccountId {
        self.follower_id
    }

    pub fn followee_id(&self) -> AccountId {
        self.followee_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loop_rejected() {
        let id = AccountId::generate();
        assert!(matches!(
            FollowEdge::new(id, id),
            Err(SocialError::SelfFollow)
        ));
    }

    #[test]
    fn test_edge_is_directed() {
        let (a, b) = (AccountId::generate(), AccountId::generate());
        let ab = FollowEdge::new(a, b).unwrap();
        let ba = FollowEdge::new(b, a).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab.follower_id(), a);
        assert_eq!(ab.followee_id(), b);
    }
}
