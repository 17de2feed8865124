// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::path::Path;

use super::summary::{Totals, page_count, totals};
use super::{Container, day_of, submit_with};
use crate::backend::TableStore;
use crate::data::{
    Entity, Mutation, TransactionPage, TransactionQuery, create_transaction, delete_transaction,
    query_transactions, update_transaction,
};
use crate::error::{Error, Result};
use crate::export::{ExportFormat, export_transactions};
use crate::forms::{Field, FieldKind, FormSpec, FormValues};
use crate::modal::Modal;
use crate::models::{Transaction, TransactionInput, TransactionKind};
use crate::utils::{fmt_money, pretty_table};

pub fn transaction_form(existing: Option<&Transaction>) -> FormSpec {
    let spec = FormSpec::form(if existing.is_some() {
        "Editar transacao"
    } else {
        "Nova transacao"
    })
    .describe("Registre uma entrada ou saida.")
    .action(if existing.is_some() { "Salvar" } else { "Adicionar" })
    .field(
        Field::new("description", "Descricao", FieldKind::text())
            .required()
            .placeholder("Ex: Mercado Central"),
    )
    .field(Field::new("subtitle", "Subtitulo", FieldKind::text()).placeholder("Cartao - Hoje"))
    .field(
        Field::new("amount", "Valor", FieldKind::Number)
            .required()
            .placeholder("R$ 0,00"),
    )
    .field(Field::new("type", "Tipo", FieldKind::select(&["income", "expense"])).required())
    .field(Field::new("category", "Categoria", FieldKind::text()).placeholder("Alimentacao"))
    .field(Field::new("date", "Data", FieldKind::Date));

    match existing {
        Some(t) => spec
            .initial("description", &t.description)
            .initial_opt("subtitle", t.subtitle.as_deref())
            .initial("amount", t.amount)
            .initial("type", t.kind)
            .initial_opt("category", t.category.as_deref())
            .initial_opt("date", day_of(&t.created_at)),
        None => spec.initial("type", TransactionKind::Expense),
    }
}

impl TryFrom<&FormValues> for TransactionInput {
    type Error = Error;

    fn try_from(v: &FormValues) -> Result<Self> {
        let kind = v
            .required_text("type")?
            .parse::<TransactionKind>()
            .map_err(|e| Error::invalid_field("type", e))?;
        Ok(TransactionInput {
            description: v.required_text("description")?,
            subtitle: v.text("subtitle"),
            amount: v.required_number("amount")?,
            kind,
            category: v.text("category"),
            created_at: v.date("date").map(|d| format!("{}T00:00:00Z", d)),
        })
    }
}

pub fn submit_transaction(
    store: &dyn TableStore,
    modal: &mut Modal,
    raw: &BTreeMap<String, String>,
    editing: Option<&str>,
) -> Result<Mutation> {
    submit_with(
        modal,
        raw,
        editing,
        |input: &TransactionInput| create_transaction(store, input),
        |id, input| update_transaction(store, id, input),
    )
}

/// Extrato: one filtered page of transactions.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub query: TransactionQuery,
    pub page: TransactionPage,
}

impl Statement {
    pub fn new(page_size: u64) -> Self {
        Self {
            query: TransactionQuery {
                page_size,
                ..TransactionQuery::default()
            },
            page: TransactionPage::default(),
        }
    }

    pub fn with_query(query: TransactionQuery) -> Self {
        Self {
            query,
            page: TransactionPage::default(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.page.data
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.page.data.iter().find(|t| t.id == id)
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.page.count, self.query.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.query.page < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.query.page > 1
    }

    /// Moves to `page`; the caller reloads.
    pub fn go_to(&mut self, page: u64) {
        self.query.page = page.max(1);
    }

    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.query.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.has_previous() {
            self.query.page -= 1;
            true
        } else {
            false
        }
    }

    /// Totals of the loaded page.
    pub fn totals(&self) -> Totals {
        totals(&self.page.data)
    }

    pub fn filter_form(&self) -> FormSpec {
        let q = &self.query;
        FormSpec::form("Filtrar extrato")
            .describe("Selecione periodo e categoria.")
            .action("Aplicar filtro")
            .field(Field::new("search", "Descricao", FieldKind::text()))
            .field(Field::new("category", "Categoria", FieldKind::text()))
            .field(Field::new("start_date", "De", FieldKind::Date))
            .field(Field::new("end_date", "Ate", FieldKind::Date))
            .initial_opt("search", q.search.as_deref())
            .initial_opt("category", q.category.as_deref())
            .initial_opt("start_date", q.start_date.map(|d| d.to_string()).as_deref())
            .initial_opt("end_date", q.end_date.map(|d| d.to_string()).as_deref())
    }

    /// Updates the filters and goes back to the first page. Omitted fields keep
    /// their current value; blank ones clear it.
    pub fn apply_filter(&mut self, raw: &BTreeMap<String, String>) -> Result<()> {
        let v = self.filter_form().parse(raw)?;
        self.query.search = v.text("search");
        self.query.category = v.text("category");
        self.query.start_date = v.date("start_date");
        self.query.end_date = v.date("end_date");
        self.query.page = 1;
        Ok(())
    }

    pub fn delete(&self, store: &dyn TableStore, id: &str) -> Result<Mutation> {
        delete_transaction(store, id)
    }

    /// Writes the loaded page, as shown, to `path`.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<()> {
        export_transactions(&self.page.data, path, format)
    }
}

impl Container for Statement {
    fn watches(&self, entity: Entity) -> bool {
        entity == Entity::Transaction
    }

    fn load(&mut self, store: &dyn TableStore) {
        match query_transactions(store, &self.query) {
            Ok(page) => self.page = page,
            Err(e) => tracing::warn!("failed to load statement: {}", e),
        }
    }

    fn render(&self) -> String {
        let rows = self
            .page
            .data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    day_of(&t.created_at).unwrap_or(t.created_at.as_str()).to_string(),
                    t.description.clone(),
                    t.subtitle.clone().unwrap_or_default(),
                    t.category.clone().unwrap_or_default(),
                    fmt_money(t.amount),
                ]
            })
            .collect();
        let t = self.totals();
        format!(
            "Movimentacoes\n{}\nPagina {} de {} ({} registros)\nEntradas {} | Saidas {} | Saldo {}",
            pretty_table(
                &["Id", "Data", "Descricao", "Subtitulo", "Categoria", "Valor"],
                rows
            ),
            self.query.page,
            self.page_count().max(1),
            self.page.count,
            fmt_money(t.income),
            fmt_money(t.expense),
            fmt_money(t.balance),
        )
    }
}
