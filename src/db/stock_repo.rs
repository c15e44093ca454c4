// src/db/stock_repo.rs

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{
        MovementReason, MovementType, StockMovement, StockRecord, StockRecordView,
        StockMovementView,
    },
};

// Repositório do núcleo de estoque: saldos (stock_records) e o
// livro-razão (stock_movements). As funções de escrita recebem a
// conexão da transação aberta pelo serviço; o lock de linha via
// FOR UPDATE serializa escritores concorrentes do mesmo saldo.
#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

const MOVEMENT_VIEW_SELECT: &str = r#"
    SELECT m.id, m.stock_record_id,
           p.name AS product_name, p.sku AS product_sku,
           w.name AS warehouse_name,
           m.movement_type, m.quantity, m.resulting_balance, m.reason,
           a.email AS account_email,
           m.unit_cost, m.reference_document, m.notes,
           wf.name AS from_warehouse_name, wt.name AS to_warehouse_name,
           m.created_at
    FROM stock_movements m
    JOIN stock_records sr ON sr.id = m.stock_record_id
    JOIN products p ON p.id = sr.product_id
    JOIN warehouses w ON w.id = sr.warehouse_id
    JOIN accounts a ON a.id = m.account_id
    LEFT JOIN warehouses wf ON wf.id = m.from_warehouse_id
    LEFT JOIN warehouses wt ON wt.id = m.to_warehouse_id
"#;

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Saldos (stock_records)
    // ---

    /// Devolve o saldo do par (produto, depósito), criando-o zerado se
    /// ainda não existir, e o tranca até o fim da transação. O
    /// ON CONFLICT DO NOTHING resolve a corrida de dois criadores
    /// simultâneos para uma única linha lógica.
    pub async fn get_or_create_for_update(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> Result<StockRecord, AppError> {
        sqlx::query(
            r#"
            INSERT INTO stock_records (product_id, warehouse_id)
            VALUES ($1, $2)
            ON CONFLICT (product_id, warehouse_id) DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .execute(&mut *conn)
        .await?;

        let record = sqlx::query_as::<_, StockRecord>(
            "SELECT * FROM stock_records WHERE product_id = $1 AND warehouse_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Tranca um saldo pelo id, já validando o escopo da empresa.
    pub async fn find_scoped_for_update(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        stock_record_id: Uuid,
    ) -> Result<Option<StockRecord>, AppError> {
        let record = sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT sr.*
            FROM stock_records sr
            JOIN products p ON p.id = sr.product_id
            WHERE sr.id = $1 AND p.company_id = $2
            FOR UPDATE OF sr
            "#,
        )
        .bind(stock_record_id)
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(record)
    }

    /// Sobrescrita direta do saldo. Usada apenas pelo ledger, depois de
    /// validar o valor alvo; valores negativos nunca chegam ao banco.
    pub async fn set_quantity(
        &self,
        conn: &mut PgConnection,
        stock_record_id: Uuid,
        new_quantity: Decimal,
    ) -> Result<(), AppError> {
        if new_quantity < Decimal::ZERO {
            return Err(AppError::InternalServerError(anyhow!(
                "tentativa de gravar saldo negativo ({new_quantity}) no stock_record {stock_record_id}"
            )));
        }

        sqlx::query(
            "UPDATE stock_records SET current_quantity = $2, updated_at = now() WHERE id = $1",
        )
        .bind(stock_record_id)
        .bind(new_quantity)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list_records(&self, company_id: Uuid) -> Result<Vec<StockRecordView>, AppError> {
        let records = sqlx::query_as::<_, StockRecordView>(
            r#"
            SELECT sr.id, sr.product_id, p.name AS product_name, p.sku AS product_sku,
                   sr.warehouse_id, w.name AS warehouse_name,
                   sr.current_quantity, sr.updated_at
            FROM stock_records sr
            JOIN products p ON p.id = sr.product_id
            JOIN warehouses w ON w.id = sr.warehouse_id
            WHERE p.company_id = $1 AND sr.is_active
            ORDER BY p.name ASC, w.name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    // ---
    // Movimentações (stock_movements)
    // ---

    /// Grava uma entrada no livro-razão. Nunca há UPDATE nem DELETE
    /// nesta tabela; o histórico só cresce.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_movement(
        &self,
        conn: &mut PgConnection,
        stock_record_id: Uuid,
        movement_type: MovementType,
        quantity: Decimal,
        resulting_balance: Decimal,
        reason: MovementReason,
        account_id: Uuid,
        unit_cost: Option<Decimal>,
        reference_document: Option<&str>,
        notes: Option<&str>,
        from_warehouse_id: Option<Uuid>,
        to_warehouse_id: Option<Uuid>,
    ) -> Result<StockMovement, AppError> {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (stock_record_id, movement_type, quantity, resulting_balance, reason,
                 account_id, unit_cost, reference_document, notes,
                 from_warehouse_id, to_warehouse_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(stock_record_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(resulting_balance)
        .bind(reason)
        .bind(account_id)
        .bind(unit_cost)
        .bind(reference_document)
        .bind(notes)
        .bind(from_warehouse_id)
        .bind(to_warehouse_id)
        .fetch_one(conn)
        .await?;

        Ok(movement)
    }

    /// Histórico completo de um saldo, em ordem cronológica, no formato
    /// mínimo que a reconciliação precisa para reconstruir o saldo.
    pub async fn movement_deltas(
        &self,
        conn: &mut PgConnection,
        stock_record_id: Uuid,
    ) -> Result<Vec<(MovementType, Decimal)>, AppError> {
        let deltas = sqlx::query_as::<_, (MovementType, Decimal)>(
            "SELECT movement_type, quantity FROM stock_movements WHERE stock_record_id = $1 ORDER BY created_at ASC",
        )
        .bind(stock_record_id)
        .fetch_all(conn)
        .await?;
        Ok(deltas)
    }

    pub async fn list_movements(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let query = format!(
            r#"{MOVEMENT_VIEW_SELECT}
            WHERE p.company_id = $1
              AND ($2::timestamptz IS NULL OR m.created_at >= $2)
              AND ($3::timestamptz IS NULL OR m.created_at <= $3)
            ORDER BY m.created_at DESC
            "#
        );
        let movements = sqlx::query_as::<_, StockMovementView>(&query)
            .bind(company_id)
            .bind(date_from)
            .bind(date_to)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }

    pub async fn recent_movements(
        &self,
        company_id: Uuid,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let query = format!(
            r#"{MOVEMENT_VIEW_SELECT}
            WHERE p.company_id = $1 AND m.created_at >= $2
            ORDER BY m.created_at DESC
            LIMIT $3
            "#
        );
        let movements = sqlx::query_as::<_, StockMovementView>(&query)
            .bind(company_id)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }

    pub async fn product_movements(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let query = format!(
            r#"{MOVEMENT_VIEW_SELECT}
            WHERE p.company_id = $1 AND sr.product_id = $2
            ORDER BY m.created_at DESC
            "#
        );
        let movements = sqlx::query_as::<_, StockMovementView>(&query)
            .bind(company_id)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }
}
