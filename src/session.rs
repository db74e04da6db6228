//! The session: one explicit context object owning the tabular store and the
//! interaction log. Every operation goes through it; there is no process-wide
//! dataset state anywhere in the crate.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chart::{self, ChartData, ChartKind};
use crate::error::Result;
use crate::execute::{self, Answer, ResultTable};
use crate::profile;
use crate::resolve::{self, HELP};
use crate::store::{LoadOptions, TabularStore};

/// Most-recent turns kept in the log; older ones are evicted front-first.
pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One recorded interaction turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Append-only bounded history of turns, oldest evicted first.
#[derive(Debug, Default)]
pub struct InteractionLog {
    turns: VecDeque<Turn>,
}

impl InteractionLog {
    pub fn record(&mut self, role: Role, content: &str) {
        self.turns.push_back(Turn {
            role,
            content: content.to_string(),
        });
        while self.turns.len() > LOG_CAPACITY {
            self.turns.pop_front();
        }
    }

    /// Ordered snapshot, oldest first.
    pub fn entries(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// An interactive exploration session over one loaded dataset.
#[derive(Debug, Default)]
pub struct Session {
    store: TabularStore,
    log: InteractionLog,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load CSV bytes, replacing any prior dataset. On failure the prior
    /// dataset survives untouched and nothing is recorded.
    pub fn load(&mut self, bytes: &[u8], name: &str, options: &LoadOptions) -> Result<String> {
        let message = self.store.load(bytes, name, options)?;
        info!(dataset = name, "{}", message);
        self.log.record(Role::System, &message);
        Ok(message)
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    /// The primary entry point: free text in, tagged answer out.
    ///
    /// A `sql:` prefix routes the remainder straight to the relational
    /// engine; everything else goes through the pattern matcher, falling
    /// back to the instructional message when nothing matches.
    pub fn ask(&mut self, text: &str) -> Result<Answer> {
        self.log.record(Role::User, text);
        let dataset = self.store.dataset()?;
        let answer = if let Some(sql) = resolve::strip_sql_prefix(text) {
            execute::relational(dataset, sql).map(Answer::Table)?
        } else {
            match resolve::resolve(text) {
                Some(query) => execute::execute(query, dataset)?,
                None => Answer::Message(HELP.to_string()),
            }
        };
        debug!(kind = answer.kind(), "answered");
        self.log.record(Role::Agent, answer.kind());
        Ok(answer)
    }

    pub fn preview(&self, n: usize) -> Result<ResultTable> {
        self.store.preview(n)
    }

    /// Column names for pickers; empty when nothing is loaded.
    pub fn columns(&self) -> Vec<String> {
        self.store
            .dataset()
            .map(|d| d.column_names())
            .unwrap_or_default()
    }

    pub fn schema(&self) -> Result<ResultTable> {
        Ok(profile::schema(self.store.dataset()?))
    }

    pub fn stats(&self) -> Result<ResultTable> {
        Ok(profile::stats(self.store.dataset()?))
    }

    pub fn missingness(&self) -> Result<ResultTable> {
        Ok(profile::missingness(self.store.dataset()?))
    }

    pub fn correlations(&self) -> Result<ResultTable> {
        Ok(profile::correlations(self.store.dataset()?))
    }

    pub fn chart_data(&self, x: &str, y: Option<&str>, kind: ChartKind) -> Result<ChartData> {
        chart::chart_data(self.store.dataset()?, x, y, kind)
    }

    pub fn history(&self) -> Vec<Turn> {
        self.log.entries()
    }
}
