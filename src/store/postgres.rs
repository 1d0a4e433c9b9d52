use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{PgPool, Row};
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::model::{EntityKind, Id, KnowledgeBase, Parameter, ParameterEdit, Pattern, Rule};
use crate::store::rename::check_rename;
use crate::store::traits::{KnowledgeBaseStore, ParameterStore, PatternStore, RuleStore, Store};

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS knowledgebase (
        idkb TEXT PRIMARY KEY,
        shortname TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS rule (
        idr TEXT PRIMARY KEY,
        shortname TEXT NOT NULL,
        idkb TEXT NOT NULL REFERENCES knowledgebase (idkb)
    )",
    "CREATE TABLE IF NOT EXISTS pattern (
        idpat TEXT PRIMARY KEY,
        shortname TEXT NOT NULL,
        idr TEXT NOT NULL REFERENCES rule (idr)
    )",
    "CREATE TABLE IF NOT EXISTS parameter (
        idpar TEXT PRIMARY KEY,
        shortname TEXT NOT NULL,
        \"type\" TEXT NOT NULL,
        idpat TEXT NOT NULL REFERENCES pattern (idpat)
    )",
];

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a connection pool using the database section of the config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let ssl_mode = PgSslMode::from_str(&config.sslmode).map_err(Error::ConnectionFailed)?;
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname)
            .ssl_mode(ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(Error::ConnectionFailed)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the hierarchy tables if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(Error::query("create hierarchy tables"))?;
        }
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn rename(&self, kind: EntityKind, id: &Id, new_short_name: &str) -> Result<()> {
        let select = format!(
            "SELECT shortname FROM {} WHERE {} <> $1",
            kind.table(),
            kind.id_column()
        );
        let rows = sqlx::query(&select)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::query("fetch short names"))?;

        let other_names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("shortname").map_err(Error::scan(kind)))
            .collect::<Result<Vec<_>>>()?;

        check_rename(kind, other_names.iter().map(String::as_str), new_short_name)?;

        let update = format!(
            "UPDATE {} SET shortname = $1 WHERE {} = $2",
            kind.table(),
            kind.id_column()
        );
        // An id with no row updates nothing and is not an error
        sqlx::query(&update)
            .bind(new_short_name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::query("update short name"))?;

        Ok(())
    }
}

fn knowledge_base_from_row(row: &PgRow) -> Result<KnowledgeBase> {
    const KIND: EntityKind = EntityKind::KnowledgeBase;
    Ok(KnowledgeBase {
        id: row.try_get("idkb").map_err(Error::scan(KIND))?,
        short_name: row.try_get("shortname").map_err(Error::scan(KIND))?,
    })
}

fn rule_from_row(row: &PgRow) -> Result<Rule> {
    const KIND: EntityKind = EntityKind::Rule;
    Ok(Rule {
        id: row.try_get("idr").map_err(Error::scan(KIND))?,
        short_name: row.try_get("shortname").map_err(Error::scan(KIND))?,
        kb_id: row.try_get("idkb").map_err(Error::scan(KIND))?,
    })
}

fn pattern_from_row(row: &PgRow) -> Result<Pattern> {
    const KIND: EntityKind = EntityKind::Pattern;
    Ok(Pattern {
        id: row.try_get("idpat").map_err(Error::scan(KIND))?,
        short_name: row.try_get("shortname").map_err(Error::scan(KIND))?,
        rule_id: row.try_get("idr").map_err(Error::scan(KIND))?,
    })
}

fn parameter_from_row(row: &PgRow) -> Result<Parameter> {
    const KIND: EntityKind = EntityKind::Parameter;
    Ok(Parameter {
        id: row.try_get("idpar").map_err(Error::scan(KIND))?,
        short_name: row.try_get("shortname").map_err(Error::scan(KIND))?,
        param_type: row.try_get("type").map_err(Error::scan(KIND))?,
        pattern_id: row.try_get("idpat").map_err(Error::scan(KIND))?,
    })
}

#[async_trait::async_trait]
impl KnowledgeBaseStore for PostgresStore {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>> {
        let rows = sqlx::query("SELECT idkb, shortname FROM knowledgebase")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::query("list knowledge bases"))?;

        rows.iter().map(knowledge_base_from_row).collect()
    }

    async fn get_knowledge_base(&self, id: &Id) -> Result<KnowledgeBase> {
        let row = sqlx::query("SELECT idkb, shortname FROM knowledgebase WHERE idkb = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::query("fetch knowledge base"))?;

        let Some(row) = row else {
            return Err(Error::NotFound {
                kind: EntityKind::KnowledgeBase,
                id: id.clone(),
            });
        };
        knowledge_base_from_row(&row)
    }

    async fn rename_knowledge_base(&self, id: &Id, new_short_name: &str) -> Result<()> {
        self.rename(EntityKind::KnowledgeBase, id, new_short_name).await
    }
}

#[async_trait::async_trait]
impl RuleStore for PostgresStore {
    async fn list_rules(&self, kb_id: &Id) -> Result<Vec<Rule>> {
        let rows = sqlx::query("SELECT idr, shortname, idkb FROM rule WHERE idkb = $1")
            .bind(kb_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::query("list rules"))?;

        rows.iter().map(rule_from_row).collect()
    }

    async fn get_rule(&self, id: &Id) -> Result<Rule> {
        let row = sqlx::query("SELECT idr, shortname, idkb FROM rule WHERE idr = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::query("fetch rule"))?;

        let Some(row) = row else {
            return Err(Error::NotFound {
                kind: EntityKind::Rule,
                id: id.clone(),
            });
        };
        rule_from_row(&row)
    }

    async fn rename_rule(&self, id: &Id, new_short_name: &str) -> Result<()> {
        self.rename(EntityKind::Rule, id, new_short_name).await
    }
}

#[async_trait::async_trait]
impl PatternStore for PostgresStore {
    async fn get_pattern_by_rule(&self, rule_id: &Id) -> Result<Pattern> {
        let row = sqlx::query(
            "SELECT idpat, shortname, idr FROM pattern WHERE idr = $1 ORDER BY idpat LIMIT 1",
        )
        .bind(rule_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::query("fetch pattern"))?;

        let Some(row) = row else {
            return Err(Error::NotFound {
                kind: EntityKind::Pattern,
                id: rule_id.clone(),
            });
        };
        pattern_from_row(&row)
    }

    async fn list_patterns(&self, rule_id: &Id) -> Result<Vec<Pattern>> {
        let rows =
            sqlx::query("SELECT idpat, shortname, idr FROM pattern WHERE idr = $1 ORDER BY idpat")
                .bind(rule_id)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::query("list patterns"))?;

        rows.iter().map(pattern_from_row).collect()
    }

    async fn rename_pattern(&self, id: &Id, new_short_name: &str) -> Result<()> {
        self.rename(EntityKind::Pattern, id, new_short_name).await
    }
}

#[async_trait::async_trait]
impl ParameterStore for PostgresStore {
    async fn list_parameters(&self, pattern_id: &Id) -> Result<Vec<Parameter>> {
        let rows = sqlx::query(
            "SELECT idpar, shortname, \"type\", idpat FROM parameter WHERE idpat = $1",
        )
        .bind(pattern_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::query("list parameters"))?;

        if rows.is_empty() {
            return Err(Error::EmptyResult {
                kind: EntityKind::Parameter,
                parent_id: pattern_id.clone(),
            });
        }
        rows.iter().map(parameter_from_row).collect()
    }

    async fn get_parameter(&self, id: &Id) -> Result<Parameter> {
        let row = sqlx::query(
            "SELECT idpar, shortname, \"type\", idpat FROM parameter WHERE idpar = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::query("fetch parameter"))?;

        let Some(row) = row else {
            return Err(Error::NotFound {
                kind: EntityKind::Parameter,
                id: id.clone(),
            });
        };
        parameter_from_row(&row)
    }

    async fn update_parameters(&self, edits: &[ParameterEdit]) -> Result<()> {
        for edit in edits {
            let result = sqlx::query(
                "UPDATE parameter SET shortname = $1, \"type\" = $2 WHERE idpar = $3",
            )
            .bind(&edit.new_shortname)
            .bind(&edit.new_type)
            .bind(&edit.id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::UpdateFailed {
                id: edit.id.clone(),
                reason: e.to_string(),
            })?;

            if result.rows_affected() == 0 {
                return Err(Error::UpdateFailed {
                    id: edit.id.clone(),
                    reason: "no such parameter".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Store for PostgresStore {}
