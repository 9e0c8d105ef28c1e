//! Access policy: who may create, list, fetch or mutate a resource.
//!
//! - No IO
//! - No panics
//! - No persistence (pure decisions over the caller and the resource)
//!
//! Rules, in short:
//! - create: always allowed; owner and minimum tier are bound to the caller.
//! - list: admins see everything; others see what they own plus everything
//!   whose minimum tier is at or below their own.
//! - get: admins and owners only. Tier never widens single-resource access,
//!   so a resource can appear in a listing yet be forbidden by id.
//! - update: the get rule, plus non-admins cannot raise a resource's tier
//!   above their own.

use tiergate_core::{DomainError, DomainResult, ResourceId};
use tiergate_resources::{NewResource, Resource, ResourceChanges, ResourceDraft, ResourceFilter};

use crate::IdentityContext;

/// Bind a creation request to its creator.
///
/// Any tier in the request is discarded; the draft carries the creator's
/// current tier. A caller without a tier is a fatal invariant violation.
pub fn authorize_create(identity: &IdentityContext, request: NewResource) -> DomainResult<ResourceDraft> {
    let tier = identity.require_tier()?;

    if let Some(requested) = request.minimum_tier.filter(|t| *t != tier) {
        tracing::debug!(
            identity_id = %identity.id(),
            requested = %requested,
            bound = %tier,
            "ignoring requested minimum tier on create"
        );
    }

    Ok(ResourceDraft::new(identity.id(), tier, request.into_attributes()))
}

/// Visibility filter for listing.
pub fn list_filter(identity: &IdentityContext) -> DomainResult<ResourceFilter> {
    if identity.is_admin() {
        return Ok(ResourceFilter::All);
    }

    Ok(ResourceFilter::OwnedOrWithinTier {
        owner: identity.id(),
        tier: identity.require_tier()?,
    })
}

/// Single-resource access: admin or owner, otherwise `Forbidden`.
///
/// `resource` is the result of looking up `id`; `None` means it does not exist.
pub fn authorize_get<'r>(
    identity: &IdentityContext,
    id: ResourceId,
    resource: Option<&'r Resource>,
) -> DomainResult<&'r Resource> {
    let resource = resource.ok_or_else(|| DomainError::not_found(format!("resource {id}")))?;

    if identity.is_admin() || resource.is_owned_by(identity.id()) {
        return Ok(resource);
    }

    Err(DomainError::forbidden("you can only access your own resources"))
}

/// Update access plus the tier ceiling; returns the merged resource.
pub fn authorize_update(
    identity: &IdentityContext,
    id: ResourceId,
    existing: Option<&Resource>,
    changes: &ResourceChanges,
) -> DomainResult<Resource> {
    let existing = authorize_get(identity, id, existing)?;

    if let Some(requested) = changes.minimum_tier {
        if !identity.is_admin() {
            let own = identity.require_tier()?;
            if requested.rank() > own.rank() {
                return Err(DomainError::forbidden("cannot set tier higher than own tier"));
            }
        }
    }

    Ok(existing.merged(changes))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tiergate_core::{Entity, IdentityId, Tier};
    use tiergate_resources::ResourceAttributes;

    use super::*;
    use crate::Role;

    fn user(id: i64, tier: Tier) -> IdentityContext {
        IdentityContext::new(IdentityId::new(id), format!("user{id}"), Role::User, tier)
    }

    fn admin(id: i64) -> IdentityContext {
        IdentityContext::new(IdentityId::new(id), "root", Role::Admin, Tier::Free)
    }

    fn resource(id: i64, owner: i64, tier: Tier) -> Resource {
        let draft = ResourceDraft::new(
            IdentityId::new(owner),
            tier,
            ResourceAttributes {
                name: format!("resource {id}"),
                description: "a tier-gated resource".to_string(),
            },
        );
        Resource::from_draft(ResourceId::new(id), draft, Utc::now())
    }

    fn request(tier: Option<Tier>) -> NewResource {
        NewResource {
            name: "Widget".to_string(),
            description: "A widget for testing".to_string(),
            minimum_tier: tier,
        }
    }

    #[test]
    fn create_binds_creator_tier_and_ignores_requested_tier() {
        let a = user(1, Tier::Basic);
        let draft = authorize_create(&a, request(Some(Tier::Enterprise))).unwrap();
        assert_eq!(draft.minimum_tier(), Tier::Basic);
        assert_eq!(draft.owner_id(), IdentityId::new(1));
    }

    #[test]
    fn create_without_tier_is_fatal() {
        let claims = crate::TokenClaims::new(
            IdentityId::new(1),
            "ghost",
            Role::User,
            Utc::now(),
            chrono::Duration::minutes(1),
        );
        let ctx = IdentityContext::from_claims(&claims);
        let err = authorize_create(&ctx, request(None)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn admin_list_filter_matches_everything() {
        assert_eq!(list_filter(&admin(9)).unwrap(), ResourceFilter::All);
    }

    #[test]
    fn free_user_lists_only_free_and_owned() {
        let b = user(2, Tier::Free);
        let filter = list_filter(&b).unwrap();
        assert!(filter.matches(&resource(1, 1, Tier::Free)));
        assert!(!filter.matches(&resource(2, 1, Tier::Basic)));
        assert!(filter.matches(&resource(3, 2, Tier::Enterprise)));
    }

    #[test]
    fn enterprise_user_lists_every_tier() {
        let c = user(3, Tier::Enterprise);
        let filter = list_filter(&c).unwrap();
        for tier in Tier::ALL {
            assert!(filter.matches(&resource(1, 1, tier)));
        }
    }

    #[test]
    fn get_missing_resource_is_not_found() {
        let err = authorize_get(&user(1, Tier::Free), ResourceId::new(77), None).unwrap_err();
        assert_eq!(err, DomainError::not_found("resource 77"));
    }

    #[test]
    fn get_allows_owner_and_admin() {
        let r = resource(1, 1, Tier::Enterprise);
        assert!(authorize_get(&user(1, Tier::Free), r.id(), Some(&r)).is_ok());
        assert!(authorize_get(&admin(9), r.id(), Some(&r)).is_ok());
    }

    #[test]
    fn get_forbids_tier_qualified_non_owner() {
        // Listed for C (enterprise >= basic) but still not fetchable by id.
        let r1 = resource(1, 1, Tier::Basic);
        let c = user(3, Tier::Enterprise);
        assert!(list_filter(&c).unwrap().matches(&r1));
        assert!(matches!(
            authorize_get(&c, r1.id(), Some(&r1)),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn get_forbids_unqualified_non_owner() {
        let r1 = resource(1, 1, Tier::Basic);
        let b = user(2, Tier::Free);
        assert!(!list_filter(&b).unwrap().matches(&r1));
        assert!(matches!(
            authorize_get(&b, r1.id(), Some(&r1)),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn update_propagates_get_outcomes() {
        let r = resource(1, 1, Tier::Free);
        let changes = ResourceChanges::default();
        assert!(matches!(
            authorize_update(&user(2, Tier::Enterprise), r.id(), Some(&r), &changes),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            authorize_update(&user(1, Tier::Free), ResourceId::new(5), None, &changes),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn owner_cannot_raise_tier_above_own() {
        let r = resource(1, 1, Tier::Free);
        let changes = ResourceChanges {
            minimum_tier: Some(Tier::Premium),
            ..Default::default()
        };
        assert_eq!(
            authorize_update(&user(1, Tier::Basic), r.id(), Some(&r), &changes),
            Err(DomainError::forbidden("cannot set tier higher than own tier"))
        );
    }

    #[test]
    fn owner_may_set_tier_up_to_own() {
        let r = resource(1, 1, Tier::Free);
        let changes = ResourceChanges {
            minimum_tier: Some(Tier::Basic),
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let merged = authorize_update(&user(1, Tier::Basic), r.id(), Some(&r), &changes).unwrap();
        assert_eq!(merged.minimum_tier(), Tier::Basic);
        assert_eq!(merged.name(), "Renamed");
        assert_eq!(merged.owner_id(), IdentityId::new(1));
    }

    #[test]
    fn admin_may_set_any_tier() {
        let r = resource(1, 1, Tier::Free);
        let changes = ResourceChanges {
            minimum_tier: Some(Tier::Enterprise),
            ..Default::default()
        };
        let merged = authorize_update(&admin(9), r.id(), Some(&r), &changes).unwrap();
        assert_eq!(merged.minimum_tier(), Tier::Enterprise);
        assert_eq!(merged.owner_id(), IdentityId::new(1));
    }

    #[cfg(test)]
    mod proptest_tests {
        use std::collections::BTreeSet;

        use super::*;
        use proptest::prelude::*;

        fn any_tier() -> impl Strategy<Value = Tier> {
            prop::sample::select(Tier::ALL.to_vec())
        }

        fn resources() -> impl Strategy<Value = Vec<Resource>> {
            prop::collection::vec((1i64..5, any_tier()), 0..30).prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(idx, (owner, tier))| resource(idx as i64 + 1, owner, tier))
                    .collect()
            })
        }

        proptest! {
            /// Property: non-admin visibility is owned ∪ tier-qualifying.
            #[test]
            fn list_is_owned_union_tier_qualifying(
                caller in 1i64..5,
                tier in any_tier(),
                all in resources(),
            ) {
                let ctx = user(caller, tier);
                let filter = list_filter(&ctx).unwrap();

                let listed: BTreeSet<ResourceId> =
                    all.iter().filter(|r| filter.matches(r)).map(|r| r.id()).collect();

                let owned: BTreeSet<ResourceId> = all
                    .iter()
                    .filter(|r| r.owner_id() == IdentityId::new(caller))
                    .map(|r| r.id())
                    .collect();
                let qualifying: BTreeSet<ResourceId> = all
                    .iter()
                    .filter(|r| r.minimum_tier().rank() <= tier.rank())
                    .map(|r| r.id())
                    .collect();

                let expected: BTreeSet<ResourceId> = owned.union(&qualifying).copied().collect();
                prop_assert_eq!(listed, expected);
            }

            /// Property: created drafts always carry the creator's tier and id.
            #[test]
            fn create_always_binds_creator(
                caller in 1i64..100,
                tier in any_tier(),
                requested in prop::option::of(any_tier()),
            ) {
                let draft = authorize_create(&user(caller, tier), request(requested)).unwrap();
                prop_assert_eq!(draft.minimum_tier(), tier);
                prop_assert_eq!(draft.owner_id(), IdentityId::new(caller));
            }

            /// Property: get by a non-owner non-admin is always forbidden.
            #[test]
            fn non_owner_get_is_forbidden(
                owner_tier in any_tier(),
                caller_tier in any_tier(),
            ) {
                let r = resource(1, 1, owner_tier);
                let result = authorize_get(&user(2, caller_tier), r.id(), Some(&r));
                prop_assert!(matches!(result, Err(DomainError::Forbidden(_))));
            }
        }
    }
}
