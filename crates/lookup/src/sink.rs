//! Output port for resolved identities.

use std::sync::{Mutex, PoisonError};

use cardkit_core::EntityId;

use crate::record::Identity;

/// Caller-owned destination for identities emitted by the lookup controller.
///
/// Called with the controller's state lock held: implementations must not
/// call back into the controller.
pub trait IdentitySink: Send + Sync {
    fn set_identity(&self, entity: Option<&EntityId>, identity: &Identity);
}

type FieldSetter = Box<dyn Fn(Option<&EntityId>, &str) + Send + Sync>;

/// Adapter over three independent field setters, each receiving the entity
/// key (if any) and the new value.
pub struct FieldSink {
    set_id: FieldSetter,
    set_first_name: FieldSetter,
    set_last_name: FieldSetter,
}

impl FieldSink {
    pub fn new(
        set_id: impl Fn(Option<&EntityId>, &str) + Send + Sync + 'static,
        set_first_name: impl Fn(Option<&EntityId>, &str) + Send + Sync + 'static,
        set_last_name: impl Fn(Option<&EntityId>, &str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            set_id: Box::new(set_id),
            set_first_name: Box::new(set_first_name),
            set_last_name: Box::new(set_last_name),
        }
    }
}

impl IdentitySink for FieldSink {
    fn set_identity(&self, entity: Option<&EntityId>, identity: &Identity) {
        (self.set_id)(entity, &identity.id);
        (self.set_first_name)(entity, &identity.first_name);
        (self.set_last_name)(entity, &identity.last_name);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub entity: Option<EntityId>,
    pub identity: Identity,
}

/// Records every emission in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    emissions: Mutex<Vec<Emission>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Emission> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.emissions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentitySink for RecordingSink {
    fn set_identity(&self, entity: Option<&EntityId>, identity: &Identity) {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Emission {
                entity: entity.cloned(),
                identity: identity.clone(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn field_sink_fans_out_with_entity() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (seen.clone(), seen.clone(), seen.clone());
        let sink = FieldSink::new(
            move |e, v| a.lock().unwrap().push(format!("id:{}:{v}", e.map_or("-", EntityId::as_str))),
            move |e, v| b.lock().unwrap().push(format!("first:{}:{v}", e.map_or("-", EntityId::as_str))),
            move |e, v| c.lock().unwrap().push(format!("last:{}:{v}", e.map_or("-", EntityId::as_str))),
        );

        let identity = Identity {
            id: "9".to_owned(),
            first_name: "Mary".to_owned(),
            last_name: "Monty".to_owned(),
        };
        sink.set_identity(Some(&EntityId::new("row-1")), &identity);
        sink.set_identity(None, &Identity::blank());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "id:row-1:9",
                "first:row-1:Mary",
                "last:row-1:Monty",
                "id:-:",
                "first:-:",
                "last:-:",
            ]
        );
    }
}
