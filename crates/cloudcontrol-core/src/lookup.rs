// ── Lookup / resolution ──
//
// Name lookups list a scope and filter client-side for an exact match.
// The provider does not enforce unique names, so what happens on
// duplicates is a `DuplicateNamePolicy` decision.

use std::collections::HashSet;
use std::future::Future;

use tracing::warn;

use cloudcontrol_api::caas::models::{
    FirewallRule, IpAddressList, NatRule, NetworkDomain, PortList, PublicIpBlock, ResourceState,
    Server, Vlan,
};

use crate::config::DuplicateNamePolicy;
use crate::converge::Stateful;
use crate::error::CoreError;

/// An entity with a provider id and a scope-unique (by convention) name.
pub trait Named {
    /// Human-readable kind, used in logs and errors.
    const KIND: &'static str;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A list that embeds other lists of the same kind.
pub trait ChildLists {
    fn child_ids(&self) -> Vec<&str>;
}

macro_rules! named {
    ($ty:ty, $kind:literal) => {
        impl Named for $ty {
            const KIND: &'static str = $kind;
            fn id(&self) -> &str {
                &self.id
            }
            fn name(&self) -> &str {
                &self.name
            }
        }

        impl Stateful for $ty {
            fn state(&self) -> &ResourceState {
                &self.state
            }
        }
    };
}

named!(NetworkDomain, "network domain");
named!(Vlan, "VLAN");
named!(Server, "server");
named!(FirewallRule, "firewall rule");
named!(PortList, "port list");
named!(IpAddressList, "IP address list");

impl Stateful for NatRule {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}

impl Stateful for PublicIpBlock {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}

impl ChildLists for PortList {
    fn child_ids(&self) -> Vec<&str> {
        self.child_port_list.iter().map(|c| c.id.as_str()).collect()
    }
}

impl ChildLists for IpAddressList {
    fn child_ids(&self) -> Vec<&str> {
        self.child_ip_address_list
            .iter()
            .map(|c| c.id.as_str())
            .collect()
    }
}

/// Pick the entity named `name` out of a listed scope.
///
/// Zero matches is `Ok(None)`; the caller decides whether that is an error.
pub fn select_by_name<T: Named>(
    items: Vec<T>,
    name: &str,
    policy: DuplicateNamePolicy,
) -> Result<Option<T>, CoreError> {
    let matches: Vec<T> = items.into_iter().filter(|i| i.name() == name).collect();
    match (matches.len(), policy) {
        (0 | 1, _) => Ok(matches.into_iter().next()),
        (count, DuplicateNamePolicy::FirstMatch) => {
            warn!(kind = T::KIND, name, count, "name is not unique, using the first match");
            Ok(matches.into_iter().next())
        }
        (count, DuplicateNamePolicy::Reject) => Err(CoreError::AmbiguousReference {
            entity_type: T::KIND.into(),
            name: name.into(),
            count,
        }),
    }
}

/// Pick the entity with provider id `id`.
pub fn select_by_id<T: Named>(items: Vec<T>, id: &str) -> Option<T> {
    items.into_iter().find(|i| i.id() == id)
}

/// Turn an absent lookup into `NotFound`.
pub fn require<T: Named>(found: Option<T>, identifier: &str) -> Result<T, CoreError> {
    found.ok_or_else(|| CoreError::not_found(T::KIND, identifier))
}

/// Resolve every child list reachable from `roots` by id.
///
/// Each id is fetched once. A failed fetch aborts with a
/// `ReferenceResolution` error naming `kind`; reaching `editing` (the list
/// about to be written) is a cycle and fails validation. Returns `roots`
/// with duplicates removed, in their original order.
pub async fn resolve_child_lists<T, F, Fut>(
    kind: &str,
    editing: Option<&str>,
    roots: &[String],
    mut fetch: F,
) -> Result<Vec<String>, CoreError>
where
    T: ChildLists,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut visited: HashSet<String> = HashSet::new();
    let mut pending: Vec<String> = roots.iter().rev().cloned().collect();

    while let Some(id) = pending.pop() {
        if editing == Some(id.as_str()) {
            return Err(CoreError::validation(format!(
                "{kind} {id} would contain itself"
            )));
        }
        if !visited.insert(id.clone()) {
            continue;
        }
        let list = fetch(id.clone())
            .await
            .map_err(|e| e.reference(kind, &id))?;
        pending.extend(list.child_ids().into_iter().map(str::to_owned));
    }

    let mut seen = HashSet::new();
    Ok(roots
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn vlan(id: &str, name: &str) -> Vlan {
        serde_json::from_value(json!({ "id": id, "name": name, "state": "NORMAL" })).unwrap()
    }

    fn port_list(id: &str, children: &[&str]) -> PortList {
        let children: Vec<_> = children.iter().map(|c| json!({ "id": c })).collect();
        serde_json::from_value(json!({
            "id": id,
            "name": id,
            "state": "NORMAL",
            "port": [{ "begin": 80 }],
            "childPortList": children
        }))
        .unwrap()
    }

    #[test]
    fn exactly_one_match_is_returned() {
        let found = select_by_name(
            vec![vlan("v-1", "web"), vlan("v-2", "X")],
            "X",
            DuplicateNamePolicy::FirstMatch,
        )
        .unwrap();
        assert_eq!(found.unwrap().id, "v-2");
    }

    #[test]
    fn zero_matches_is_none_and_require_is_not_found() {
        let found =
            select_by_name(vec![vlan("v-1", "web")], "X", DuplicateNamePolicy::Reject).unwrap();
        assert!(found.is_none());
        assert!(matches!(
            require(found, "X"),
            Err(CoreError::NotFound { ref entity_type, .. }) if entity_type == "VLAN"
        ));
    }

    #[test]
    fn duplicates_follow_policy() {
        let items = || vec![vlan("v-1", "X"), vlan("v-2", "X")];

        let first = select_by_name(items(), "X", DuplicateNamePolicy::FirstMatch).unwrap();
        assert_eq!(first.unwrap().id, "v-1");

        let err = select_by_name(items(), "X", DuplicateNamePolicy::Reject).unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousReference { count: 2, .. }));
    }

    fn graph() -> HashMap<String, PortList> {
        [
            port_list("a", &["b"]),
            port_list("b", &["c"]),
            port_list("c", &[]),
            port_list("loop", &["a", "edit"]),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect()
    }

    async fn walk(editing: Option<&str>, roots: &[&str]) -> Result<Vec<String>, CoreError> {
        let graph = graph();
        let roots: Vec<String> = roots.iter().map(|r| (*r).to_owned()).collect();
        resolve_child_lists("child port list", editing, &roots, |id| {
            let found = graph.get(&id).cloned();
            async move { found.ok_or_else(|| CoreError::not_found("port list", id)) }
        })
        .await
    }

    #[tokio::test]
    async fn acyclic_children_resolve_and_dedupe() {
        let ids = walk(Some("edit"), &["a", "c", "a"]).await.unwrap();
        assert_eq!(ids, vec!["a".to_owned(), "c".to_owned()]);
    }

    #[tokio::test]
    async fn reaching_the_edited_list_is_a_cycle() {
        let err = walk(Some("edit"), &["loop"]).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn missing_child_names_the_reference_kind() {
        let err = walk(None, &["ghost"]).await.unwrap_err();
        match err {
            CoreError::ReferenceResolution {
                kind, reference, ..
            } => {
                assert_eq!(kind, "child port list");
                assert_eq!(reference, "ghost");
            }
            other => panic!("expected reference failure, got {other:?}"),
        }
    }
}
