//! Specialization requests and the deferred instantiation queue.
//!
//! Call sites that name a generic with explicit type arguments cannot be
//! specialized on the spot: the generic may be declared later, or may refer
//! back to the callable being visited. Such requests are queued and realized
//! after the declaration list has been walked.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tern_core::Span;
use tern_registry::SpecializationKey;

/// A request to realize one specialization of a generic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecializationRequest {
    pub key: SpecializationKey,
    /// The reference that caused the request.
    pub requested_at: Span,
}

/// FIFO of pending specialization requests, deduplicated by key.
///
/// A key is only ever accepted once, so a request that failed is not retried
/// by later references to the same (generic, types) pair.
#[derive(Debug, Default)]
pub struct SpecializationQueue {
    pending: VecDeque<SpecializationRequest>,
    seen: FxHashSet<SpecializationKey>,
}

impl SpecializationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Returns `false` if its key was already queued.
    pub fn enqueue(&mut self, request: SpecializationRequest) -> bool {
        if !self.seen.insert(request.key.clone()) {
            return false;
        }
        self.pending.push_back(request);
        true
    }

    pub fn pop(&mut self) -> Option<SpecializationRequest> {
        self.pending.pop_front()
    }

    /// Whether a key has ever been queued.
    pub fn contains(&self, key: &SpecializationKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hand the still-pending requests to the caller.
    pub fn into_pending(self) -> Vec<SpecializationRequest> {
        self.pending.into()
    }
}

/// The unique name of a callable realized for a specialization.
///
/// Each type name is prefixed by its length so distinct type vectors never
/// produce the same name: `Id` with `[Smi]` becomes `Id3Smi`. Non-generic
/// callables keep their source name.
pub fn generated_callable_name(name: &str, type_names: &[String]) -> String {
    let mut generated = name.to_string();
    for type_name in type_names {
        generated.push_str(&type_name.len().to_string());
        generated.push_str(type_name);
    }
    generated
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_core::{GenericId, TypeHash};

    fn request(generic: u32, types: &[&str]) -> SpecializationRequest {
        SpecializationRequest {
            key: SpecializationKey::new(
                GenericId::new(generic),
                types.iter().map(|t| TypeHash::from_name(t)).collect(),
            ),
            requested_at: Span::default(),
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut queue = SpecializationQueue::new();
        assert!(queue.enqueue(request(0, &["Smi"])));
        assert!(!queue.enqueue(request(0, &["Smi"])));
        assert!(queue.enqueue(request(0, &["Object"])));
        assert!(queue.enqueue(request(1, &["Smi"])));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn popped_keys_stay_seen() {
        let mut queue = SpecializationQueue::new();
        queue.enqueue(request(0, &["Smi"]));
        let popped = queue.pop().unwrap();
        assert!(queue.is_empty());
        assert!(queue.contains(&popped.key));
        assert!(!queue.enqueue(request(0, &["Smi"])));
    }

    #[test]
    fn requests_drain_in_order() {
        let mut queue = SpecializationQueue::new();
        queue.enqueue(request(0, &["Smi"]));
        queue.enqueue(request(0, &["Object"]));
        let pending = queue.into_pending();
        assert_eq!(pending, vec![request(0, &["Smi"]), request(0, &["Object"])]);
    }

    #[test]
    fn generated_names_are_length_prefixed() {
        assert_eq!(generated_callable_name("Id", &[]), "Id");
        assert_eq!(generated_callable_name("Id", &["Smi".to_string()]), "Id3Smi");
        assert_eq!(
            generated_callable_name("Convert", &["Smi".to_string(), "HeapObject".to_string()]),
            "Convert3Smi10HeapObject"
        );
        assert_ne!(
            generated_callable_name("F", &["AB".to_string(), "C".to_string()]),
            generated_callable_name("F", &["A".to_string(), "BC".to_string()])
        );
    }
}
