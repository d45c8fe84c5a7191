//! PostgreSQL catalog reader.

use crate::config::DatabaseConfig;
use crate::core::{ColumnMetadata, EnumRow};
use crate::error::{GenError, Result};
use crate::source::CatalogSource;
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use rustls::ClientConfig;
use std::sync::Arc;
use tokio_postgres::Config as PgConfig;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{debug, info, warn};

const COLUMNS_QUERY: &str = r#"
    SELECT
        a.attname::text,
        format_type(a.atttypid, NULL),
        NOT a.attnotnull,
        pg_get_expr(d.adbin, d.adrelid),
        COALESCE(et.typname, t.typname)::text,
        (a.attidentity IN ('a', 'd')
            OR COALESCE(pg_get_expr(d.adbin, d.adrelid), '') LIKE 'nextval(%'),
        CASE
            WHEN COALESCE(et.typname, t.typname) IN ('bpchar', 'varchar') AND a.atttypmod > 4
            THEN a.atttypmod - 4
        END::int4
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
    LEFT JOIN pg_catalog.pg_type et ON et.oid = t.typelem AND t.typcategory = 'A'
    LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
    WHERE n.nspname = $1
      AND c.relname = $2
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY a.attnum
"#;

const ENUMS_QUERY: &str = r#"
    SELECT t.typname::text, e.enumlabel::text, e.enumsortorder
    FROM pg_catalog.pg_enum e
    JOIN pg_catalog.pg_type t ON t.oid = e.enumtypid
    ORDER BY t.typname, e.enumsortorder
"#;

const TABLES_QUERY: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1 AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

/// Catalog reader backed by a deadpool connection pool.
pub struct PgCatalog {
    pool: Pool,
}

impl PgCatalog {
    /// Build the pool and verify connectivity.
    pub async fn connect(config: &DatabaseConfig, max_conns: usize) -> Result<Self> {
        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(config.port);
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);
        pg_config.application_name("pg-zod-gen");

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let pool = match config.ssl_mode.to_lowercase().as_str() {
            "disable" => {
                warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
                let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
                Pool::builder(mgr)
                    .max_size(max_conns)
                    .build()
                    .map_err(|e| GenError::pool(e, "creating PostgreSQL catalog pool"))?
            }
            mode => {
                let tls_config = Self::build_tls_config(mode)?;
                let mgr = Manager::from_config(pg_config, MakeRustlsConnect::new(tls_config), mgr_config);
                Pool::builder(mgr)
                    .max_size(max_conns)
                    .build()
                    .map_err(|e| GenError::pool(e, "creating PostgreSQL catalog pool"))?
            }
        };

        let catalog = Self { pool };
        catalog.test_connection().await?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(catalog)
    }

    fn build_tls_config(ssl_mode: &str) -> Result<ClientConfig> {
        let builder = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| GenError::Config(format!("TLS setup failed: {}", e)))?;

        let config = match ssl_mode {
            "require" => {
                warn!(
                    "ssl_mode=require: TLS enabled but server certificate is not verified. \
                     Consider using 'verify-full' for production."
                );
                builder
                    .dangerous()
                    .with_custom_certificate_verifier(Arc::new(NoVerifier))
                    .with_no_client_auth()
            }
            "verify-ca" | "verify-full" => {
                info!("ssl_mode={}: certificate verification enabled", ssl_mode);
                let mut root_store = rustls::RootCertStore::empty();
                root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
                builder
                    .with_root_certificates(root_store)
                    .with_no_client_auth()
            }
            other => {
                return Err(GenError::Config(format!(
                    "Invalid ssl_mode '{}'. Valid options: disable, require, verify-ca, verify-full",
                    other
                )));
            }
        };

        Ok(config)
    }

    async fn client(&self, context: &str) -> Result<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| GenError::pool(e, context))
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        let client = self.client("getting connection for list_tables").await?;
        let rows = client.query(TABLES_QUERY, &[&schema]).await?;
        let tables: Vec<String> = rows.iter().map(|row| row.get(0)).collect();

        debug!("Found {} tables in schema {}", tables.len(), schema);
        Ok(tables)
    }

    async fn fetch_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnMetadata>> {
        let client = self.client("getting connection for fetch_columns").await?;
        let rows = client.query(COLUMNS_QUERY, &[&schema, &table]).await?;

        let columns: Vec<ColumnMetadata> = rows
            .iter()
            .map(|row| ColumnMetadata {
                name: row.get(0),
                sql_type: row.get(1),
                nullable: row.get(2),
                raw_default: row.get(3),
                underlying_type_name: row.get(4),
                is_identity: row.get(5),
                max_length: row.get(6),
            })
            .collect();

        debug!("Loaded {} columns for {}.{}", columns.len(), schema, table);
        Ok(columns)
    }

    async fn fetch_enums(&self) -> Result<Vec<EnumRow>> {
        let client = self.client("getting connection for fetch_enums").await?;
        let rows = client.query(ENUMS_QUERY, &[]).await?;

        let enums: Vec<EnumRow> = rows
            .iter()
            .map(|row| EnumRow::new(row.get::<_, String>(0), row.get::<_, String>(1), row.get(2)))
            .collect();

        debug!("Loaded {} enum labels", enums.len());
        Ok(enums)
    }

    async fn test_connection(&self) -> Result<()> {
        let client = self.client("testing PostgreSQL connection").await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    fn db_type(&self) -> &str {
        "postgres"
    }
}

/// Certificate verifier that accepts any server certificate.
///
/// Only used for `ssl_mode=require`, which encrypts without authenticating
/// the server. Use `verify-full` on untrusted networks.
#[derive(Debug)]
struct NoVerifier;

impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_config_rejects_unknown_mode() {
        let err = PgCatalog::build_tls_config("prefer").unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
        assert!(err.to_string().contains("prefer"));
    }

    #[test]
    fn test_tls_config_modes() {
        assert!(PgCatalog::build_tls_config("require").is_ok());
        assert!(PgCatalog::build_tls_config("verify-full").is_ok());
    }

    #[test]
    fn test_columns_query_binds_schema_and_table() {
        assert!(COLUMNS_QUERY.contains("n.nspname = $1"));
        assert!(COLUMNS_QUERY.contains("c.relname = $2"));
        assert!(COLUMNS_QUERY.contains("ORDER BY a.attnum"));
    }
}
