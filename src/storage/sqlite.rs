//! SQLite storage backend for conceptmap

use super::traits::{
    ArticleBatch, BatchWrite, CollectionQuery, CollectionSort, ConceptGraphStore, OpenStore,
    SortOrder, StorageError, StorageResult,
};
use crate::graph::{
    Article, ArticleId, CollectedConcept, CollectionEntry, Concept, ConceptId, ConceptRelation,
    EntryId, NewArticle, NewConcept, NewRelation, RelationId, UserId, MAX_RELATION_STRENGTH,
    MIN_RELATION_STRENGTH,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior,
};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Mutex;

const ARTICLE_COLUMNS: &str =
    "a.id, a.title, a.title_localized, a.original_url, a.summary, a.created_at, a.graph_cache";

const CONCEPT_COLUMNS: &str = "c.id, c.name, c.description, c.examples_json";

const RELATION_COLUMNS: &str = "r.id, r.from_concept_id, r.to_concept_id, r.relation_type, r.strength";

/// SQLite-backed concept store
///
/// Uses a single SQLite database file. Thread-safe via internal mutex on the
/// connection; WAL mode lets other processes read while this one writes.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Article columns as read from a row, before timestamp parsing
struct ArticleRow {
    id: i64,
    title: String,
    title_localized: Option<String>,
    original_url: String,
    summary: String,
    created_at: String,
    graph_cache: Option<String>,
}

impl ArticleRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            title_localized: row.get(2)?,
            original_url: row.get(3)?,
            summary: row.get(4)?,
            created_at: row.get(5)?,
            graph_cache: row.get(6)?,
        })
    }

    fn into_article(self) -> StorageResult<Article> {
        Ok(Article {
            id: ArticleId::new(self.id),
            title: self.title,
            title_localized: self.title_localized,
            original_url: self.original_url,
            summary: self.summary,
            created_at: parse_timestamp(&self.created_at)?,
            graph_cache: self.graph_cache,
        })
    }
}

/// Concept columns as read from a row, before examples are decoded
struct ConceptRow {
    id: i64,
    name: String,
    description: String,
    examples_json: String,
}

impl ConceptRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            examples_json: row.get(3)?,
        })
    }

    fn into_concept(self) -> StorageResult<Concept> {
        Ok(Concept {
            id: ConceptId::new(self.id),
            name: self.name,
            description: self.description,
            examples: serde_json::from_str(&self.examples_json)?,
        })
    }
}

fn read_relation(row: &Row<'_>) -> rusqlite::Result<ConceptRelation> {
    Ok(ConceptRelation {
        id: RelationId::new(row.get(0)?),
        from: ConceptId::new(row.get(1)?),
        to: ConceptId::new(row.get(2)?),
        relation_type: row.get(3)?,
        // CHECK constraint keeps this within 1..=10
        strength: row.get::<_, i64>(4)? as u8,
    })
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    // Fixed-width so text ordering matches time ordering
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(text: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StorageError::DateParse(e.to_string()))
}

/// `?,?,?` with one placeholder per id
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

fn raw_ids(ids: &[ConceptId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

// Row-level writes and lookups shared by single operations and batch
// transactions (a `Transaction` derefs to `Connection`).

fn insert_article_row(conn: &Connection, article: &NewArticle) -> StorageResult<Article> {
    let created_at = format_timestamp(&Utc::now());
    conn.execute(
        r#"
        INSERT INTO articles (title, title_localized, original_url, summary, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            article.title,
            article.title_localized,
            article.original_url,
            article.summary,
            created_at,
        ],
    )?;

    Ok(Article {
        id: ArticleId::new(conn.last_insert_rowid()),
        title: article.title.clone(),
        title_localized: article.title_localized.clone(),
        original_url: article.original_url.clone(),
        summary: article.summary.clone(),
        created_at: parse_timestamp(&created_at)?,
        graph_cache: None,
    })
}

fn article_by_url(conn: &Connection, url: &str) -> StorageResult<Option<Article>> {
    let sql = format!(
        "SELECT {} FROM articles a WHERE a.original_url = ?1",
        ARTICLE_COLUMNS
    );
    let row = conn
        .query_row(&sql, params![url], ArticleRow::read)
        .optional()?;
    row.map(ArticleRow::into_article).transpose()
}

fn link_row(conn: &Connection, article: ArticleId, concept: ConceptId) -> StorageResult<bool> {
    let rows = conn.execute(
        "INSERT OR IGNORE INTO article_concepts (article_id, concept_id) VALUES (?1, ?2)",
        params![article.get(), concept.get()],
    )?;
    Ok(rows > 0)
}

fn insert_concept_row(conn: &Connection, concept: &NewConcept) -> StorageResult<Concept> {
    let examples_json = serde_json::to_string(&concept.examples)?;
    conn.execute(
        "INSERT INTO concepts (name, description, examples_json) VALUES (?1, ?2, ?3)",
        params![concept.name, concept.description, examples_json],
    )?;

    Ok(Concept {
        id: ConceptId::new(conn.last_insert_rowid()),
        name: concept.name.clone(),
        description: concept.description.clone(),
        examples: concept.examples.clone(),
    })
}

fn concept_by_name(conn: &Connection, name: &str) -> StorageResult<Option<Concept>> {
    let sql = format!("SELECT {} FROM concepts c WHERE c.name = ?1", CONCEPT_COLUMNS);
    let row = conn
        .query_row(&sql, params![name], ConceptRow::read)
        .optional()?;
    row.map(ConceptRow::into_concept).transpose()
}

fn concept_id_by_name(conn: &Connection, name: &str) -> StorageResult<Option<ConceptId>> {
    let id = conn
        .query_row(
            "SELECT id FROM concepts WHERE name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id.map(ConceptId::new))
}

fn insert_relation_row(conn: &Connection, relation: &NewRelation) -> StorageResult<ConceptRelation> {
    if !(MIN_RELATION_STRENGTH..=MAX_RELATION_STRENGTH).contains(&relation.strength) {
        return Err(StorageError::InvalidStrength(relation.strength));
    }

    conn.execute(
        r#"
        INSERT INTO concept_relations (from_concept_id, to_concept_id, relation_type, strength)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            relation.from.get(),
            relation.to.get(),
            relation.relation_type,
            i64::from(relation.strength),
        ],
    )?;

    Ok(ConceptRelation {
        id: RelationId::new(conn.last_insert_rowid()),
        from: relation.from,
        to: relation.to,
        relation_type: relation.relation_type.clone(),
        strength: relation.strength,
    })
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Enable foreign keys (cascading deletes depend on it)
            PRAGMA foreign_keys = ON;

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                title_localized TEXT,
                original_url TEXT NOT NULL UNIQUE,
                summary TEXT NOT NULL,
                created_at TEXT NOT NULL,
                graph_cache TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_articles_created_at
                ON articles(created_at);

            CREATE TABLE IF NOT EXISTS concepts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                examples_json TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS concept_relations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                from_concept_id INTEGER NOT NULL,
                to_concept_id INTEGER NOT NULL,
                relation_type TEXT,
                strength INTEGER NOT NULL CHECK (strength BETWEEN 1 AND 10),
                FOREIGN KEY (from_concept_id) REFERENCES concepts(id) ON DELETE CASCADE,
                FOREIGN KEY (to_concept_id) REFERENCES concepts(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_relations_from
                ON concept_relations(from_concept_id, strength);
            CREATE INDEX IF NOT EXISTS idx_relations_to
                ON concept_relations(to_concept_id, strength);

            CREATE TABLE IF NOT EXISTS article_concepts (
                article_id INTEGER NOT NULL,
                concept_id INTEGER NOT NULL,
                PRIMARY KEY (article_id, concept_id),
                FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE,
                FOREIGN KEY (concept_id) REFERENCES concepts(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_article_concepts_concept
                ON article_concepts(concept_id);

            CREATE TABLE IF NOT EXISTS user_collections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                concept_id INTEGER NOT NULL,
                collected_at TEXT NOT NULL,
                UNIQUE (user_id, concept_id),
                FOREIGN KEY (concept_id) REFERENCES concepts(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_user_collections_collected_at
                ON user_collections(user_id, collected_at);
            "#,
        )?;

        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a relation query of the form `<column> IN (ids) AND strength >= ?`
    fn relations_by_endpoint(
        &self,
        column: &str,
        ids: &[ConceptId],
        min_strength: u8,
    ) -> StorageResult<Vec<ConceptRelation>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM concept_relations r WHERE r.{} IN ({}) AND r.strength >= ? ORDER BY r.id",
            RELATION_COLUMNS,
            column,
            placeholders(ids.len())
        );
        let mut bind = raw_ids(ids);
        bind.push(i64::from(min_strength));

        let mut stmt = conn.prepare(&sql)?;
        let relations = stmt
            .query_map(params_from_iter(bind), read_relation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(relations)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl ConceptGraphStore for SqliteStore {
    // === Article Operations ===

    fn insert_article(&self, article: &NewArticle) -> StorageResult<Article> {
        let conn = self.conn.lock().unwrap();
        insert_article_row(&conn, article)
    }

    fn insert_article_batch(&self, batch: &ArticleBatch) -> StorageResult<BatchWrite> {
        let mut conn = self.conn.lock().unwrap();
        // Dropping `tx` without commit rolls every write back
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = article_by_url(&tx, &batch.article.original_url)? {
            return Ok(BatchWrite {
                article_id: existing.id,
                duplicate: true,
                created_concepts: 0,
                linked_concepts: 0,
                relations_added: 0,
                unresolved: Vec::new(),
            });
        }

        let article = insert_article_row(&tx, &batch.article)?;
        let mut write = BatchWrite {
            article_id: article.id,
            duplicate: false,
            created_concepts: 0,
            linked_concepts: 0,
            relations_added: 0,
            unresolved: Vec::new(),
        };

        let mut by_name: HashMap<&str, ConceptId> = HashMap::new();
        for concept in &batch.concepts {
            let id = match concept_by_name(&tx, &concept.name)? {
                Some(existing) => existing.id,
                None => {
                    write.created_concepts += 1;
                    insert_concept_row(&tx, concept)?.id
                }
            };
            if link_row(&tx, article.id, id)? {
                write.linked_concepts += 1;
            }
            by_name.insert(concept.name.as_str(), id);
        }

        for relation in &batch.relations {
            let endpoint = |name: &str| -> StorageResult<Option<ConceptId>> {
                match by_name.get(name) {
                    Some(id) => Ok(Some(*id)),
                    None => concept_id_by_name(&tx, name),
                }
            };
            match (endpoint(&relation.from)?, endpoint(&relation.to)?) {
                (Some(from), Some(to)) => {
                    let new = NewRelation {
                        from,
                        to,
                        relation_type: relation.relation_type.clone(),
                        strength: relation.strength,
                    };
                    insert_relation_row(&tx, &new)?;
                    write.relations_added += 1;
                }
                _ => write.unresolved.push(relation.clone()),
            }
        }

        tx.commit()?;
        Ok(write)
    }

    fn load_article(&self, id: ArticleId) -> StorageResult<Option<Article>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {} FROM articles a WHERE a.id = ?1", ARTICLE_COLUMNS);

        let row = conn
            .query_row(&sql, params![id.get()], ArticleRow::read)
            .optional()?;
        row.map(ArticleRow::into_article).transpose()
    }

    fn find_article_by_url(&self, url: &str) -> StorageResult<Option<Article>> {
        let conn = self.conn.lock().unwrap();
        article_by_url(&conn, url)
    }

    fn delete_article(&self, id: ArticleId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM articles WHERE id = ?1", params![id.get()])?;
        Ok(rows > 0)
    }

    fn link_article_concept(&self, article: ArticleId, concept: ConceptId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        link_row(&conn, article, concept)
    }

    fn article_concepts(&self, article: ArticleId) -> StorageResult<Vec<Concept>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            r#"
            SELECT {} FROM concepts c
            JOIN article_concepts ac ON ac.concept_id = c.id
            WHERE ac.article_id = ?1
            ORDER BY c.id
            "#,
            CONCEPT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![article.get()], ConceptRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ConceptRow::into_concept).collect()
    }

    fn concept_articles(&self, concept: ConceptId, limit: usize) -> StorageResult<Vec<Article>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            r#"
            SELECT {} FROM articles a
            JOIN article_concepts ac ON ac.article_id = a.id
            WHERE ac.concept_id = ?1
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT ?2
            "#,
            ARTICLE_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![concept.get(), limit as i64], ArticleRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ArticleRow::into_article).collect()
    }

    fn save_graph_cache(&self, article: ArticleId, graph_json: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();

        // First write wins; an existing cache is never replaced.
        let rows = conn.execute(
            r#"
            UPDATE articles SET graph_cache = ?2
            WHERE id = ?1 AND (graph_cache IS NULL OR graph_cache = '')
            "#,
            params![article.get(), graph_json],
        )?;
        Ok(rows > 0)
    }

    // === Concept Operations ===

    fn insert_concept(&self, concept: &NewConcept) -> StorageResult<Concept> {
        let conn = self.conn.lock().unwrap();
        insert_concept_row(&conn, concept)
    }

    fn load_concept(&self, id: ConceptId) -> StorageResult<Option<Concept>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {} FROM concepts c WHERE c.id = ?1", CONCEPT_COLUMNS);

        let row = conn
            .query_row(&sql, params![id.get()], ConceptRow::read)
            .optional()?;
        row.map(ConceptRow::into_concept).transpose()
    }

    fn load_concepts(&self, ids: &[ConceptId]) -> StorageResult<Vec<Concept>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM concepts c WHERE c.id IN ({}) ORDER BY c.id",
            CONCEPT_COLUMNS,
            placeholders(ids.len())
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(raw_ids(ids)), ConceptRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ConceptRow::into_concept).collect()
    }

    fn find_concept_by_name(&self, name: &str) -> StorageResult<Option<Concept>> {
        let conn = self.conn.lock().unwrap();
        concept_by_name(&conn, name)
    }

    fn search_concepts(&self, query: &str, limit: usize) -> StorageResult<Vec<Concept>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            r#"
            SELECT {} FROM concepts c
            WHERE c.name LIKE ?1 ESCAPE '\'
            ORDER BY c.name, c.id
            LIMIT ?2
            "#,
            CONCEPT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![like_pattern(query), limit as i64], ConceptRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ConceptRow::into_concept).collect()
    }

    fn delete_concept(&self, id: ConceptId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM concepts WHERE id = ?1", params![id.get()])?;
        Ok(rows > 0)
    }

    // === Relation Operations ===

    fn insert_relation(&self, relation: &NewRelation) -> StorageResult<ConceptRelation> {
        let conn = self.conn.lock().unwrap();
        insert_relation_row(&conn, relation)
    }

    fn relations_from(
        &self,
        sources: &[ConceptId],
        min_strength: u8,
    ) -> StorageResult<Vec<ConceptRelation>> {
        self.relations_by_endpoint("from_concept_id", sources, min_strength)
    }

    fn relations_to(
        &self,
        targets: &[ConceptId],
        min_strength: u8,
    ) -> StorageResult<Vec<ConceptRelation>> {
        self.relations_by_endpoint("to_concept_id", targets, min_strength)
    }

    fn collection_relations(&self, user: UserId) -> StorageResult<Vec<ConceptRelation>> {
        let conn = self.conn.lock().unwrap();
        // Subqueries keep the bound parameter count fixed however large the collection
        let sql = format!(
            r#"
            SELECT {} FROM concept_relations r
            WHERE r.from_concept_id IN (SELECT concept_id FROM user_collections WHERE user_id = ?1)
              AND r.to_concept_id IN (SELECT concept_id FROM user_collections WHERE user_id = ?1)
            ORDER BY r.id
            "#,
            RELATION_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let relations = stmt
            .query_map(params![user.get()], read_relation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(relations)
    }

    // === Collection Operations ===

    fn collected_concept_ids(&self, user: UserId) -> StorageResult<BTreeSet<ConceptId>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT concept_id FROM user_collections WHERE user_id = ?1")?;

        let ids = stmt
            .query_map(params![user.get()], |row| row.get::<_, i64>(0))?
            .map(|id| id.map(ConceptId::new))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ids)
    }

    fn find_collection(
        &self,
        user: UserId,
        concept: ConceptId,
    ) -> StorageResult<Option<CollectionEntry>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, collected_at FROM user_collections WHERE user_id = ?1 AND concept_id = ?2",
                params![user.get(), concept.get()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id, collected_at)) => Ok(Some(CollectionEntry {
                id: EntryId::new(id),
                user_id: user,
                concept_id: concept,
                collected_at: parse_timestamp(&collected_at)?,
            })),
            None => Ok(None),
        }
    }

    fn create_collection(
        &self,
        user: UserId,
        concept: ConceptId,
    ) -> StorageResult<CollectionEntry> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let duplicate = StorageError::DuplicateCollection {
            user_id: user,
            concept_id: concept,
        };

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM user_collections WHERE user_id = ?1 AND concept_id = ?2",
                params![user.get(), concept.get()],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(duplicate);
        }

        let collected_at = format_timestamp(&Utc::now());
        match tx.execute(
            "INSERT INTO user_collections (user_id, concept_id, collected_at) VALUES (?1, ?2, ?3)",
            params![user.get(), concept.get(), collected_at],
        ) {
            Ok(_) => {}
            // Another connection won the race between check and insert
            Err(e) if is_unique_violation(&e) => return Err(duplicate),
            Err(e) => return Err(e.into()),
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(CollectionEntry {
            id: EntryId::new(id),
            user_id: user,
            concept_id: concept,
            collected_at: parse_timestamp(&collected_at)?,
        })
    }

    fn delete_collection(&self, user: UserId, concept: ConceptId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM user_collections WHERE user_id = ?1 AND concept_id = ?2",
            params![user.get(), concept.get()],
        )?;
        Ok(rows > 0)
    }

    fn list_collections(
        &self,
        user: UserId,
        query: &CollectionQuery,
    ) -> StorageResult<Vec<CollectedConcept>> {
        let conn = self.conn.lock().unwrap();
        let order_by = match (query.sort, query.order) {
            (CollectionSort::CollectedAt, SortOrder::Desc) => "uc.collected_at DESC, uc.id DESC",
            (CollectionSort::CollectedAt, SortOrder::Asc) => "uc.collected_at ASC, uc.id ASC",
            (CollectionSort::Name, SortOrder::Desc) => "c.name DESC, c.id DESC",
            (CollectionSort::Name, SortOrder::Asc) => "c.name ASC, c.id ASC",
        };
        let sql = format!(
            r#"
            SELECT {}, uc.id, uc.collected_at FROM concepts c
            JOIN user_collections uc ON uc.concept_id = c.id
            WHERE uc.user_id = ?1
            ORDER BY {}
            "#,
            CONCEPT_COLUMNS, order_by
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user.get()], |row| {
                Ok((
                    ConceptRow::read(row)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(concept, entry_id, collected_at)| {
                Ok(CollectedConcept {
                    concept: concept.into_concept()?,
                    entry_id: EntryId::new(entry_id),
                    collected_at: parse_timestamp(&collected_at)?,
                })
            })
            .collect()
    }
}
