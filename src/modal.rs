// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::data::Mutation;
use crate::error::{Error, Result};
use crate::forms::{FormSpec, FormValues, ModalMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Open,
    Submitting,
    /// Last submission was rejected; the modal stays open.
    Failed,
    Closed,
}

/// An open form plus its submission state.
pub struct Modal {
    pub spec: FormSpec,
    state: ModalState,
    last_error: Option<String>,
}

impl Modal {
    pub fn open(spec: FormSpec) -> Self {
        Self {
            spec,
            state: ModalState::Open,
            last_error: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.spec.mode == ModalMode::Form
            && matches!(self.state, ModalState::Open | ModalState::Failed)
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    /// Parses `raw` and hands the values to `handler`. Closes on success and
    /// returns the handler's mutation; on any error stays open as `Failed`.
    pub fn submit<F>(&mut self, raw: &BTreeMap<String, String>, handler: F) -> Result<Mutation>
    where
        F: FnOnce(FormValues) -> Result<Mutation>,
    {
        if !self.can_submit() {
            return Err(Error::invalid_field(
                &self.spec.title,
                "this modal does not accept submissions",
            ));
        }
        self.state = ModalState::Submitting;
        let outcome = self.spec.parse(raw).and_then(handler);
        match &outcome {
            Ok(m) => {
                tracing::debug!(title = %self.spec.title, ?m, "modal submitted");
                self.last_error = None;
                self.state = ModalState::Closed;
            }
            Err(e) => {
                tracing::warn!(title = %self.spec.title, "submission failed: {}", e);
                self.last_error = Some(e.to_string());
                self.state = ModalState::Failed;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Entity, MutationKind};
    use crate::forms::{Field, FieldKind};

    fn spec() -> FormSpec {
        FormSpec::form("Nova meta")
            .field(Field::new("title", "Titulo", FieldKind::text()).required())
    }

    fn raw(title: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("title".to_string(), title.to_string())])
    }

    #[test]
    fn closes_after_successful_submit() {
        let mut modal = Modal::open(spec());
        let m = modal
            .submit(&raw("Viagem"), |v| {
                assert_eq!(v.text("title").as_deref(), Some("Viagem"));
                Ok(Mutation::new(Entity::Goal, MutationKind::Created, None))
            })
            .unwrap();
        assert_eq!(m.entity, Entity::Goal);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.can_submit());
    }

    #[test]
    fn stays_open_when_handler_fails() {
        let mut modal = Modal::open(spec());
        let res = modal.submit(&raw("Viagem"), |_| Err(Error::NotAuthenticated));
        assert!(res.is_err());
        assert_eq!(modal.state(), ModalState::Failed);
        assert!(modal.last_error().is_some());

        // A retry is allowed and clears the failure.
        modal
            .submit(&raw("Viagem"), |_| {
                Ok(Mutation::new(Entity::Goal, MutationKind::Created, None))
            })
            .unwrap();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(modal.last_error().is_none());
    }

    #[test]
    fn invalid_values_never_reach_the_handler() {
        let mut modal = Modal::open(spec());
        let res = modal.submit(&BTreeMap::new(), |_| panic!("handler must not run"));
        assert!(res.is_err());
        assert_eq!(modal.state(), ModalState::Failed);
    }

    #[test]
    fn view_modals_reject_submit() {
        let mut modal = Modal::open(FormSpec::view("Exportar", "csv".into()));
        assert!(modal
            .submit(&BTreeMap::new(), |_| panic!("handler must not run"))
            .is_err());
    }
}
