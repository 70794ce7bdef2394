//! Channel access evaluation
//!
//! Pure functions over a channel and the requester's membership. Every rule
//! that gates reading, writing, joining, leaving and managing a channel lives
//! here so services only translate the verdict into an error.

use crate::entities::{Channel, MemberRole};
use crate::value_objects::Snowflake;

/// Who is asking, and what role (if any) they hold in the channel being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: Snowflake,
    pub role: Option<MemberRole>,
}

impl Requester {
    pub fn new(user_id: Snowflake, role: Option<MemberRole>) -> Self {
        Self { user_id, role }
    }

    #[inline]
    pub fn is_member(&self) -> bool {
        self.role.is_some()
    }
}

/// The member a management action targets, if they belong to the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMember {
    pub user_id: Snowflake,
    pub role: MemberRole,
}

/// Management actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    UpdateChannel,
    DeleteChannel,
    ChangeRole {
        target: Option<TargetMember>,
        new_role: MemberRole,
    },
    RemoveMember {
        target: Option<TargetMember>,
    },
}

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// Non-member asked about a private or unlisted channel; reported as not found
    ChannelHidden(Snowflake),
    InsufficientRole,
    NotMember,
    TargetNotMember,
    SelfRoleChange,
    SelfRemoval,
    AdminImmune,
    AdminCannotLeave,
    NotJoinable,
    AlreadyMember,
}

/// Stateless access-control evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl;

impl AccessControl {
    /// Public channels are readable by anyone, others by members only
    #[inline]
    pub fn can_read(channel: &Channel, requester: &Requester) -> bool {
        channel.is_public() || requester.is_member()
    }

    /// Writing follows the same visibility rule as reading
    #[inline]
    pub fn can_write(channel: &Channel, requester: &Requester) -> bool {
        channel.is_public() || requester.is_member()
    }

    pub fn can_manage(channel: &Channel, requester: &Requester, action: ManageAction) -> bool {
        Self::check_manage(channel, requester, action).is_ok()
    }

    pub fn check_read(channel: &Channel, requester: &Requester) -> Result<(), AccessDenial> {
        if Self::can_read(channel, requester) {
            Ok(())
        } else {
            Err(AccessDenial::ChannelHidden(channel.id))
        }
    }

    pub fn check_write(channel: &Channel, requester: &Requester) -> Result<(), AccessDenial> {
        if Self::can_write(channel, requester) {
            Ok(())
        } else {
            Err(AccessDenial::ChannelHidden(channel.id))
        }
    }

    /// Evaluate a management action, reporting the first rule it breaks
    pub fn check_manage(
        channel: &Channel,
        requester: &Requester,
        action: ManageAction,
    ) -> Result<(), AccessDenial> {
        Self::check_read(channel, requester)?;
        let role = requester.role.ok_or(AccessDenial::InsufficientRole)?;

        match action {
            ManageAction::UpdateChannel | ManageAction::DeleteChannel => {
                if role.is_admin() {
                    Ok(())
                } else {
                    Err(AccessDenial::InsufficientRole)
                }
            }
            ManageAction::ChangeRole { target, new_role } => {
                let authorized =
                    role.is_admin() || (role.is_moderator() && new_role == MemberRole::Member);
                if !authorized {
                    return Err(AccessDenial::InsufficientRole);
                }
                let target = target.ok_or(AccessDenial::TargetNotMember)?;
                if target.user_id == requester.user_id && target.role.is_admin() {
                    return Err(AccessDenial::SelfRoleChange);
                }
                if !role.is_admin() && target.role != MemberRole::Member {
                    return Err(AccessDenial::InsufficientRole);
                }
                Ok(())
            }
            ManageAction::RemoveMember { target } => {
                if !(role.is_admin() || role.is_moderator()) {
                    return Err(AccessDenial::InsufficientRole);
                }
                let target = target.ok_or(AccessDenial::TargetNotMember)?;
                if target.role.is_admin() {
                    return Err(AccessDenial::AdminImmune);
                }
                if target.user_id == requester.user_id {
                    return Err(AccessDenial::SelfRemoval);
                }
                if !role.is_admin() && target.role != MemberRole::Member {
                    return Err(AccessDenial::InsufficientRole);
                }
                Ok(())
            }
        }
    }

    /// Only public channels are self-joinable; unlisted membership is invitation-granted
    pub fn check_join(channel: &Channel, requester: &Requester) -> Result<(), AccessDenial> {
        if !channel.is_public() {
            return Err(AccessDenial::NotJoinable);
        }
        if requester.is_member() {
            return Err(AccessDenial::AlreadyMember);
        }
        Ok(())
    }

    pub fn check_leave(channel: &Channel, requester: &Requester) -> Result<(), AccessDenial> {
        Self::check_read(channel, requester)?;
        match requester.role {
            None => Err(AccessDenial::NotMember),
            Some(MemberRole::Admin) => Err(AccessDenial::AdminCannotLeave),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ChannelPrivacy;

    const ALICE: Snowflake = Snowflake::new(1);
    const BOB: Snowflake = Snowflake::new(2);
    const CAROL: Snowflake = Snowflake::new(3);

    fn channel(privacy: ChannelPrivacy) -> Channel {
        Channel::new(
            Snowflake::new(100),
            "night-market".to_string(),
            None,
            privacy,
            ALICE,
        )
    }

    fn target(user_id: Snowflake, role: MemberRole) -> Option<TargetMember> {
        Some(TargetMember { user_id, role })
    }

    #[test]
    fn test_public_channel_open_to_outsiders() {
        let ch = channel(ChannelPrivacy::Public);
        let outsider = Requester::new(BOB, None);
        assert!(AccessControl::can_read(&ch, &outsider));
        assert!(AccessControl::can_write(&ch, &outsider));
    }

    #[test]
    fn test_private_and_unlisted_require_membership() {
        for privacy in [ChannelPrivacy::Private, ChannelPrivacy::Unlisted] {
            let ch = channel(privacy);
            let outsider = Requester::new(BOB, None);
            let member = Requester::new(BOB, Some(MemberRole::Member));
            assert!(!AccessControl::can_write(&ch, &outsider));
            assert!(AccessControl::can_write(&ch, &member));
            assert_eq!(
                AccessControl::check_read(&ch, &outsider),
                Err(AccessDenial::ChannelHidden(ch.id))
            );
        }
    }

    #[test]
    fn test_update_and_delete_are_admin_only() {
        let ch = channel(ChannelPrivacy::Public);
        let admin = Requester::new(ALICE, Some(MemberRole::Admin));
        let moderator = Requester::new(BOB, Some(MemberRole::Moderator));
        let outsider = Requester::new(CAROL, None);
        assert!(AccessControl::can_manage(&ch, &admin, ManageAction::DeleteChannel));
        assert_eq!(
            AccessControl::check_manage(&ch, &moderator, ManageAction::UpdateChannel),
            Err(AccessDenial::InsufficientRole)
        );
        assert_eq!(
            AccessControl::check_manage(&ch, &outsider, ManageAction::UpdateChannel),
            Err(AccessDenial::InsufficientRole)
        );
    }

    #[test]
    fn test_manage_private_channel_as_outsider_is_hidden() {
        let ch = channel(ChannelPrivacy::Private);
        let outsider = Requester::new(CAROL, None);
        assert_eq!(
            AccessControl::check_manage(&ch, &outsider, ManageAction::DeleteChannel),
            Err(AccessDenial::ChannelHidden(ch.id))
        );
    }

    #[test]
    fn test_admin_cannot_change_own_role() {
        let ch = channel(ChannelPrivacy::Public);
        let admin = Requester::new(ALICE, Some(MemberRole::Admin));
        let action = ManageAction::ChangeRole {
            target: target(ALICE, MemberRole::Admin),
            new_role: MemberRole::Member,
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &admin, action),
            Err(AccessDenial::SelfRoleChange)
        );
    }

    #[test]
    fn test_moderator_only_acts_on_plain_members() {
        let ch = channel(ChannelPrivacy::Public);
        let moderator = Requester::new(BOB, Some(MemberRole::Moderator));

        let on_member = ManageAction::ChangeRole {
            target: target(CAROL, MemberRole::Member),
            new_role: MemberRole::Member,
        };
        assert!(AccessControl::can_manage(&ch, &moderator, on_member));

        let promote = ManageAction::ChangeRole {
            target: target(CAROL, MemberRole::Member),
            new_role: MemberRole::Moderator,
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &moderator, promote),
            Err(AccessDenial::InsufficientRole)
        );

        let demote_peer = ManageAction::ChangeRole {
            target: target(CAROL, MemberRole::Moderator),
            new_role: MemberRole::Member,
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &moderator, demote_peer),
            Err(AccessDenial::InsufficientRole)
        );

        let remove_member = ManageAction::RemoveMember {
            target: target(CAROL, MemberRole::Member),
        };
        assert!(AccessControl::can_manage(&ch, &moderator, remove_member));

        let remove_peer = ManageAction::RemoveMember {
            target: target(CAROL, MemberRole::Moderator),
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &moderator, remove_peer),
            Err(AccessDenial::InsufficientRole)
        );
    }

    #[test]
    fn test_admins_are_immune_to_removal() {
        let ch = channel(ChannelPrivacy::Public);
        let admin = Requester::new(ALICE, Some(MemberRole::Admin));
        let other_admin = ManageAction::RemoveMember {
            target: target(BOB, MemberRole::Admin),
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &admin, other_admin),
            Err(AccessDenial::AdminImmune)
        );
    }

    #[test]
    fn test_cannot_remove_self() {
        let ch = channel(ChannelPrivacy::Public);
        let moderator = Requester::new(BOB, Some(MemberRole::Moderator));
        let action = ManageAction::RemoveMember {
            target: target(BOB, MemberRole::Moderator),
        };
        assert_eq!(
            AccessControl::check_manage(&ch, &moderator, action),
            Err(AccessDenial::SelfRemoval)
        );
    }

    #[test]
    fn test_missing_target_is_reported() {
        let ch = channel(ChannelPrivacy::Public);
        let admin = Requester::new(ALICE, Some(MemberRole::Admin));
        assert_eq!(
            AccessControl::check_manage(&ch, &admin, ManageAction::RemoveMember { target: None }),
            Err(AccessDenial::TargetNotMember)
        );
    }

    #[test]
    fn test_join_rules() {
        let public = channel(ChannelPrivacy::Public);
        let unlisted = channel(ChannelPrivacy::Unlisted);
        let outsider = Requester::new(BOB, None);
        let member = Requester::new(BOB, Some(MemberRole::Member));
        assert!(AccessControl::check_join(&public, &outsider).is_ok());
        assert_eq!(
            AccessControl::check_join(&public, &member),
            Err(AccessDenial::AlreadyMember)
        );
        assert_eq!(
            AccessControl::check_join(&unlisted, &outsider),
            Err(AccessDenial::NotJoinable)
        );
    }

    #[test]
    fn test_leave_rules() {
        let ch = channel(ChannelPrivacy::Public);
        assert_eq!(
            AccessControl::check_leave(&ch, &Requester::new(ALICE, Some(MemberRole::Admin))),
            Err(AccessDenial::AdminCannotLeave)
        );
        assert_eq!(
            AccessControl::check_leave(&ch, &Requester::new(BOB, None)),
            Err(AccessDenial::NotMember)
        );
        assert!(
            AccessControl::check_leave(&ch, &Requester::new(BOB, Some(MemberRole::Moderator)))
                .is_ok()
        );
    }
}
