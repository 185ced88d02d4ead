// スキーマ抽出サービス
//
// sqlite_master と PRAGMA table_info からスキーマスナップショットを構築します。
// sqlite_ プレフィックスの内部テーブルと、SQLiteがUNIQUE/PRIMARY KEYの
// ために自動生成するインデックス（sqlがNULL）は除外します。

use crate::core::error::DatabaseError;
use crate::core::schema::{Column, Database, Index, Table, Trigger, View};
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;

/// スキーマ抽出サービス
#[derive(Debug, Clone, Default)]
pub struct SchemaExtractorService;

impl SchemaExtractorService {
    /// 新しいSchemaExtractorServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// 接続先データベースの完全なスナップショットを抽出
    pub async fn extract(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Database, DatabaseError> {
        let mut database = Database::new();

        self.extract_tables(conn, &mut database).await?;
        self.extract_indexes(conn, &mut database).await?;
        self.extract_views(conn, &mut database).await?;
        self.extract_triggers(conn, &mut database).await?;

        Ok(database)
    }

    async fn extract_tables(
        &self,
        conn: &mut SqliteConnection,
        database: &mut Database,
    ) -> Result<(), DatabaseError> {
        let rows = sqlx::query(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_error("Failed to read table definitions", e))?;

        for row in rows {
            let name: String = row.get("name");
            let sql: String = row.get("sql");
            let mut table = Table::new(name.clone(), sql);

            let column_rows = sqlx::query(
                "SELECT name, type, \"notnull\", dflt_value, pk \
                 FROM pragma_table_info(?1) ORDER BY cid",
            )
            .bind(&name)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                query_error(&format!("Failed to read columns of table \"{}\"", name), e)
            })?;

            for column_row in column_rows {
                let not_null: i64 = column_row.get("notnull");
                table.add_column(Column {
                    name: column_row.get("name"),
                    column_type: column_row.get("type"),
                    not_null: not_null != 0,
                    default_value: column_row.get("dflt_value"),
                    primary_key: column_row.get("pk"),
                });
            }

            database.add_table(table);
        }

        Ok(())
    }

    async fn extract_indexes(
        &self,
        conn: &mut SqliteConnection,
        database: &mut Database,
    ) -> Result<(), DatabaseError> {
        let rows = sqlx::query(
            "SELECT name, tbl_name, sql FROM sqlite_master \
             WHERE type = 'index' AND sql IS NOT NULL AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_error("Failed to read index definitions", e))?;

        for row in rows {
            // sql IS NOT NULL で絞っているが、NULLデコードには保守的に備える
            let sql: Option<String> = row.get("sql");
            let Some(sql) = sql else { continue };

            database.add_index(Index::new(row.get("name"), row.get("tbl_name"), sql));
        }

        Ok(())
    }

    async fn extract_views(
        &self,
        conn: &mut SqliteConnection,
        database: &mut Database,
    ) -> Result<(), DatabaseError> {
        let rows = sqlx::query(
            "SELECT name, sql FROM sqlite_master WHERE type = 'view' ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_error("Failed to read view definitions", e))?;

        for row in rows {
            database.add_view(View::new(row.get("name"), row.get("sql")));
        }

        Ok(())
    }

    async fn extract_triggers(
        &self,
        conn: &mut SqliteConnection,
        database: &mut Database,
    ) -> Result<(), DatabaseError> {
        let rows = sqlx::query(
            "SELECT name, tbl_name, sql FROM sqlite_master WHERE type = 'trigger' ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_error("Failed to read trigger definitions", e))?;

        for row in rows {
            database.add_trigger(Trigger::new(
                row.get("name"),
                row.get("tbl_name"),
                row.get("sql"),
            ));
        }

        Ok(())
    }
}

fn query_error(message: &str, error: sqlx::Error) -> DatabaseError {
    DatabaseError::Query {
        message: message.to_string(),
        cause: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::DatabaseConnectionService;

    async fn extract_from_sql(sql: &str) -> Database {
        let connections = DatabaseConnectionService::new();
        let mut conn = connections.connect_in_memory().await.unwrap();
        sqlx::raw_sql(sql).execute(&mut conn).await.unwrap();

        SchemaExtractorService::new().extract(&mut conn).await.unwrap()
    }

    #[tokio::test]
    async fn test_extract_table_with_columns() {
        let database = extract_from_sql(
            "CREATE TABLE users (\
               id INTEGER PRIMARY KEY, \
               name TEXT NOT NULL, \
               bio TEXT, \
               score REAL DEFAULT 1.5\
             );",
        )
        .await;

        let table = database.get_table("users").unwrap();
        assert_eq!(table.column_names(), vec!["id", "name", "bio", "score"]);

        let id = table.get_column("id").unwrap();
        assert_eq!(id.primary_key, 1);
        assert!(!id.not_null);

        let name = table.get_column("name").unwrap();
        assert!(name.not_null);
        assert!(name.default_value.is_none());

        let score = table.get_column("score").unwrap();
        assert_eq!(score.default_value.as_deref(), Some("1.5"));
        assert_eq!(score.column_type, "REAL");

        assert!(table.sql.contains("CREATE TABLE users"));
    }

    #[tokio::test]
    async fn test_extract_excludes_auto_indexes() {
        // UNIQUE制約が生むsqlite_autoindexはsqlがNULLであり、除外される
        let database = extract_from_sql(
            "CREATE TABLE u (email TEXT UNIQUE); \
             CREATE INDEX idx_u_email ON u(email);",
        )
        .await;

        assert_eq!(database.indexes.len(), 1);
        assert!(database.indexes.contains_key("idx_u_email"));
        assert_eq!(database.indexes["idx_u_email"].table, "u");
    }

    #[tokio::test]
    async fn test_extract_views_and_triggers() {
        let database = extract_from_sql(
            "CREATE TABLE t (a TEXT); \
             CREATE VIEW v AS SELECT a FROM t; \
             CREATE TRIGGER trg AFTER INSERT ON t BEGIN SELECT 1; END;",
        )
        .await;

        assert!(database.views.contains_key("v"));
        assert!(database.triggers.contains_key("trg"));
        assert_eq!(database.triggers["trg"].table, "t");
        assert!(database.triggers["trg"].sql.to_uppercase().contains("END"));
    }

    #[tokio::test]
    async fn test_extract_empty_database() {
        let connections = DatabaseConnectionService::new();
        let mut conn = connections.connect_in_memory().await.unwrap();

        let database = SchemaExtractorService::new().extract(&mut conn).await.unwrap();
        assert!(database.is_empty());
    }

    #[tokio::test]
    async fn test_extract_composite_primary_key_ordinals() {
        let database = extract_from_sql(
            "CREATE TABLE pairs (a TEXT, b TEXT, PRIMARY KEY (a, b));",
        )
        .await;

        let table = database.get_table("pairs").unwrap();
        assert_eq!(table.get_column("a").unwrap().primary_key, 1);
        assert_eq!(table.get_column("b").unwrap().primary_key, 2);
    }
}
