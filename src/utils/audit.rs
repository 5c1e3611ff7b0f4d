//! Bitácora de cambios por campo (`invoices_log`, `projects_log`)
//!
//! La fila se lee bloqueada antes del UPDATE y se compara con la devuelta por
//! `RETURNING`; cada campo distinto genera una fila en la bitácora dentro de
//! la misma transacción.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};

use crate::utils::errors::AppResult;

/// Campos auditados de una entidad, como texto
pub trait AuditFields {
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field_name: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Campos cuyo valor cambió entre `before` y `after`
pub fn diff<T: AuditFields>(before: &T, after: &T) -> Vec<FieldChange> {
    before
        .audit_fields()
        .into_iter()
        .zip(after.audit_fields())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((field_name, old_value), (_, new_value))| FieldChange {
            field_name,
            old_value,
            new_value,
        })
        .collect()
}

/// Bitácoras disponibles
#[derive(Debug, Clone, Copy)]
pub enum ChangeLog {
    Invoices,
    Projects,
}

impl ChangeLog {
    fn table(&self) -> &'static str {
        match self {
            ChangeLog::Invoices => "invoices_log",
            ChangeLog::Projects => "projects_log",
        }
    }

    fn entity_column(&self) -> &'static str {
        match self {
            ChangeLog::Invoices => "invoice_id",
            ChangeLog::Projects => "project_id",
        }
    }
}

pub async fn insert_changes(
    conn: &mut PgConnection,
    log: ChangeLog,
    entity_id: i32,
    user_id: i32,
    changes: &[FieldChange],
) -> AppResult<()> {
    if changes.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "INSERT INTO {} ({}, user_id, field_name, old_value, new_value) ",
        log.table(),
        log.entity_column()
    ));
    builder.push_values(changes, |mut row, change| {
        row.push_bind(entity_id)
            .push_bind(user_id)
            .push_bind(change.field_name)
            .push_bind(change.old_value.clone())
            .push_bind(change.new_value.clone());
    });
    builder.build().execute(&mut *conn).await?;
    Ok(())
}

/// Fila de bitácora con el nombre de quien hizo el cambio
#[derive(Debug, Serialize, FromRow)]
pub struct ChangeLogEntry {
    pub id: i32,
    pub user_id: Option<i32>,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_date: DateTime<Utc>,
    pub changed_by_name: Option<String>,
}

pub async fn list_changes(
    conn: &mut PgConnection,
    log: ChangeLog,
    entity_id: i32,
) -> AppResult<Vec<ChangeLogEntry>> {
    let sql = format!(
        "SELECT l.id, l.user_id, l.field_name, l.old_value, l.new_value, l.change_date, \
         u.username AS changed_by_name \
         FROM {} l LEFT JOIN users u ON l.user_id = u.id \
         WHERE l.{} = $1 ORDER BY l.change_date DESC, l.id DESC",
        log.table(),
        log.entity_column()
    );
    let rows = sqlx::query_as::<_, ChangeLogEntry>(&sql)
        .bind(entity_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Representación textual de un valor opcional
pub fn text<T: ToString>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        status: Option<i32>,
        notes: Option<String>,
    }

    impl AuditFields for Sample {
        fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
            vec![
                ("name", Some(self.name.clone())),
                ("status", text(&self.status)),
                ("notes", self.notes.clone()),
            ]
        }
    }

    #[test]
    fn test_diff_reports_only_changed_fields() {
        let before = Sample {
            name: "Bridge".to_string(),
            status: Some(1),
            notes: None,
        };
        let after = Sample {
            name: "Bridge".to_string(),
            status: Some(2),
            notes: Some("approved".to_string()),
        };

        let changes = diff(&before, &after);
        assert_eq!(
            changes,
            vec![
                FieldChange {
                    field_name: "status",
                    old_value: Some("1".to_string()),
                    new_value: Some("2".to_string()),
                },
                FieldChange {
                    field_name: "notes",
                    old_value: None,
                    new_value: Some("approved".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_diff_of_identical_rows_is_empty() {
        let row = Sample {
            name: "Bridge".to_string(),
            status: None,
            notes: None,
        };
        assert!(diff(&row, &row).is_empty());
    }
}
