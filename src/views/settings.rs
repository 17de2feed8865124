// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::thread;

use serde::Serialize;

use super::{Container, settle};
use crate::backend::{TableStore, User};
use crate::data::{
    Entity, Mutation, fetch_alert_settings, fetch_profile, update_profile, upsert_alert_settings,
};
use crate::error::{Error, Result};
use crate::forms::{Field, FieldKind, FormSpec};
use crate::modal::Modal;
use crate::models::{AlertSettings, Profile, ProfileUpdate};
use crate::utils::{fmt_money, fmt_percent, pretty_table};

pub fn alerts_form(current: &AlertSettings) -> FormSpec {
    FormSpec::form("Alertas")
        .describe("Quando avisar sobre limite e assinaturas.")
        .field(Field::new("limit_percent", "Uso do limite (%)", FieldKind::Number).required())
        .field(
            Field::new("subscriptions_budget", "Orcamento de assinaturas", FieldKind::Number)
                .required(),
        )
        .initial("limit_percent", current.limit_percent)
        .initial("subscriptions_budget", current.subscriptions_budget)
}

pub fn profile_form(profile: Option<&Profile>) -> FormSpec {
    FormSpec::form("Perfil")
        .field(Field::new("name", "Nome", FieldKind::text()).required())
        .field(
            Field::new(
                "email",
                "E-mail",
                FieldKind::Text {
                    pattern: Some(r"^[^@\s]+@[^@\s]+$".into()),
                },
            )
            .required(),
        )
        .initial_opt("name", profile.and_then(|p| p.name.as_deref()))
        .initial_opt("email", profile.and_then(|p| p.email.as_deref()))
}

pub fn submit_alerts(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
) -> Result<Mutation> {
    modal.submit(raw, |v| {
        let settings = AlertSettings {
            limit_percent: v.required_number("limit_percent")?,
            subscriptions_budget: v.required_number("subscriptions_budget")?,
        };
        upsert_alert_settings(store, &settings)
    })
}

pub fn submit_profile(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    user_id: &str,
) -> Result<Mutation> {
    modal.submit(raw, |v| {
        let update = ProfileUpdate {
            name: v.required_text("name")?,
            email: v.required_text("email")?,
        };
        update_profile(store, user_id, &update)
    })
}

/// Configuracoes: who is signed in, their profile and alert thresholds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Settings {
    pub user: Option<User>,
    pub profile: Option<Profile>,
    pub alerts: AlertSettings,
}

impl Settings {
    pub fn user_id(&self) -> Result<&str> {
        self.user
            .as_ref()
            .map(|u| u.id.as_str())
            .ok_or(Error::NotAuthenticated)
    }
}

impl Container for Settings {
    fn watches(&self, entity: Entity) -> bool {
        matches!(entity, Entity::Profile | Entity::AlertSettings)
    }

    fn load(&mut self, store: &dyn TableStore) {
        match store.current_user() {
            Ok(user) => self.user = user,
            Err(e) => tracing::warn!("failed to load current user: {}", e),
        }
        let Some(user_id) = self.user.as_ref().map(|u| u.id.clone()) else {
            tracing::debug!("no signed-in user; settings left as they are");
            return;
        };
        thread::scope(|s| {
            let profile = s.spawn(|| fetch_profile(store, &user_id).map(Some));
            let alerts = s.spawn(|| fetch_alert_settings(store));
            settle("profile", profile.join(), &mut self.profile);
            settle("alert settings", alerts.join(), &mut self.alerts);
        });
    }

    fn render(&self) -> String {
        let who = match &self.user {
            Some(u) => format!(
                "Conectado como {}",
                u.email.as_deref().unwrap_or(u.id.as_str())
            ),
            None => "Nenhum usuario conectado".to_string(),
        };
        let profile = self.profile.as_ref();
        let rows = vec![
            vec![
                "Nome".to_string(),
                profile.and_then(|p| p.name.clone()).unwrap_or_default(),
            ],
            vec![
                "E-mail".to_string(),
                profile.and_then(|p| p.email.clone()).unwrap_or_default(),
            ],
            vec![
                "Alerta de limite".to_string(),
                fmt_percent(self.alerts.limit_percent),
            ],
            vec![
                "Orcamento de assinaturas".to_string(),
                fmt_money(self.alerts.subscriptions_budget),
            ],
        ];
        format!("{}\n{}", who, pretty_table(&["Campo", "Valor"], rows))
    }
}
