// src/services/stock_service.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StockRepository, WarehouseRepository},
    models::{
        product::Product,
        stock::{
            MovementReason, MovementType, ReconcileOutcome, StockMovement, StockMovementView,
            StockRecordView,
        },
        warehouse::Warehouse,
    },
};

// ---
// Regras puras do ledger
// ---

/// Saldo resultante de aplicar uma movimentação a um saldo atual.
///
/// TRANSFER aqui é sempre a perna de débito na origem; o crédito no
/// destino entra no livro como uma movimentação IN comum. O saldo
/// resultante é calculado a partir do valor pré-movimentação, nunca
/// relido depois da escrita.
fn resulting_balance(
    current: Decimal,
    movement_type: MovementType,
    quantity: Decimal,
) -> Result<Decimal, AppError> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::InvalidQuantity);
    }

    match movement_type {
        MovementType::In => Ok(current + quantity),
        MovementType::Out | MovementType::Transfer => {
            if quantity > current {
                Err(AppError::InsufficientStock { available: current })
            } else {
                Ok(current - quantity)
            }
        }
    }
}

/// Reconstrói um saldo somando o histórico completo com sinal:
/// IN soma; OUT e a perna de débito das transferências subtraem.
fn replay_balance(deltas: &[(MovementType, Decimal)]) -> Decimal {
    deltas.iter().fold(Decimal::ZERO, |acc, (ty, qty)| match ty {
        MovementType::In => acc + *qty,
        MovementType::Out | MovementType::Transfer => acc - *qty,
    })
}

/// Deriva a movimentação equivalente a "definir o saldo em new_quantity".
fn adjustment_delta(
    current: Decimal,
    new_quantity: Decimal,
) -> Result<(MovementType, Decimal), AppError> {
    let difference = new_quantity - current;
    if difference.is_zero() {
        return Err(AppError::NoOpAdjustment);
    }
    if difference > Decimal::ZERO {
        Ok((MovementType::In, difference))
    } else {
        Ok((MovementType::Out, difference.abs()))
    }
}

// ---
// Entradas dos serviços
// ---

#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub reason: MovementReason,
    pub unit_cost: Option<Decimal>,
    pub reference_document: Option<String>,
    pub notes: Option<String>,
    pub to_warehouse_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub new_quantity: Decimal,
    pub notes: String,
}

// ---
// O serviço
// ---

// Único escritor de stock_records.current_quantity. Toda mutação
// multi-linha (movimentação + saldo; as duas pernas de uma
// transferência) roda dentro de UMA transação, com a linha do saldo
// trancada via FOR UPDATE para serializar escritores concorrentes.
#[derive(Clone)]
pub struct StockService {
    stock_repo: StockRepository,
    product_repo: ProductRepository,
    warehouse_repo: WarehouseRepository,
    pool: PgPool,
}

impl StockService {
    pub fn new(
        stock_repo: StockRepository,
        product_repo: ProductRepository,
        warehouse_repo: WarehouseRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            stock_repo,
            product_repo,
            warehouse_repo,
            pool,
        }
    }

    async fn load_product(&self, company_id: Uuid, product_id: Uuid) -> Result<Product, AppError> {
        let product = self
            .product_repo
            .find_product_any(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if product.company_id != company_id {
            return Err(AppError::CrossCompanyReference("product"));
        }
        Ok(product)
    }

    async fn load_warehouse(
        &self,
        company_id: Uuid,
        warehouse_id: Uuid,
        field: &'static str,
    ) -> Result<Warehouse, AppError> {
        let warehouse = self
            .warehouse_repo
            .find_any(warehouse_id)
            .await?
            .ok_or(AppError::WarehouseNotFound)?;

        if warehouse.company_id != company_id {
            return Err(AppError::CrossCompanyReference(field));
        }
        Ok(warehouse)
    }

    // --- CRIAR MOVIMENTAÇÃO ---
    pub async fn create_movement(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        input: NewMovement,
    ) -> Result<StockMovement, AppError> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity);
        }

        let product = self.load_product(company_id, input.product_id).await?;
        let warehouse = self
            .load_warehouse(company_id, input.warehouse_id, "warehouse")
            .await?;

        // Transferência vira duas pernas encadeadas; o resto é uma perna só.
        if input.movement_type == MovementType::Transfer {
            let to_id = input
                .to_warehouse_id
                .ok_or(AppError::TransferRequiresBothWarehouses)?;
            if to_id == warehouse.id {
                return Err(AppError::SameWarehouseTransfer);
            }
            let to_warehouse = self.load_warehouse(company_id, to_id, "toWarehouse").await?;
            return self
                .transfer(account_id, &product, &warehouse, &to_warehouse, &input)
                .await;
        }

        let mut tx = self.pool.begin().await?;

        // 1. Resolve (ou cria) o saldo e tranca a linha
        let record = self
            .stock_repo
            .get_or_create_for_update(&mut *tx, product.id, warehouse.id)
            .await?;

        // 2. Valida a pré-condição e calcula o saldo resultante
        let new_balance =
            resulting_balance(record.current_quantity, input.movement_type, input.quantity)?;

        // 3. Grava a movimentação e o novo saldo juntos
        let movement = self
            .stock_repo
            .insert_movement(
                &mut *tx,
                record.id,
                input.movement_type,
                input.quantity,
                new_balance,
                input.reason,
                account_id,
                input.unit_cost,
                input.reference_document.as_deref(),
                input.notes.as_deref(),
                None,
                None,
            )
            .await?;
        self.stock_repo
            .set_quantity(&mut *tx, record.id, new_balance)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    // --- TRANSFERÊNCIA (duas pernas, uma transação) ---
    async fn transfer(
        &self,
        account_id: Uuid,
        product: &Product,
        from: &Warehouse,
        to: &Warehouse,
        input: &NewMovement,
    ) -> Result<StockMovement, AppError> {
        // Se o crédito no destino falhar, o débito na origem desfaz junto.
        let mut tx = self.pool.begin().await?;

        // 1. Débito na origem
        let origin = self
            .stock_repo
            .get_or_create_for_update(&mut *tx, product.id, from.id)
            .await?;
        let origin_balance =
            resulting_balance(origin.current_quantity, MovementType::Transfer, input.quantity)?;

        let debit = self
            .stock_repo
            .insert_movement(
                &mut *tx,
                origin.id,
                MovementType::Transfer,
                input.quantity,
                origin_balance,
                input.reason,
                account_id,
                input.unit_cost,
                input.reference_document.as_deref(),
                input.notes.as_deref(),
                Some(from.id),
                Some(to.id),
            )
            .await?;
        self.stock_repo
            .set_quantity(&mut *tx, origin.id, origin_balance)
            .await?;

        // 2. Crédito no destino (saldo criado sob demanda)
        let dest = self
            .stock_repo
            .get_or_create_for_update(&mut *tx, product.id, to.id)
            .await?;
        let dest_balance =
            resulting_balance(dest.current_quantity, MovementType::In, input.quantity)?;

        let credit_note = format!("Transferência recebida de {}", from.name);
        self.stock_repo
            .insert_movement(
                &mut *tx,
                dest.id,
                MovementType::In,
                input.quantity,
                dest_balance,
                MovementReason::Transfer,
                account_id,
                input.unit_cost,
                input.reference_document.as_deref(),
                Some(&credit_note),
                Some(from.id),
                Some(to.id),
            )
            .await?;
        self.stock_repo
            .set_quantity(&mut *tx, dest.id, dest_balance)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Transferência de {} un. do produto {} ({} -> {})",
            input.quantity,
            product.sku,
            from.name,
            to.name
        );

        // A perna de origem é o registro principal da operação
        Ok(debit)
    }

    // --- AJUSTE (define o saldo em um valor alvo) ---
    pub async fn adjust(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        input: NewAdjustment,
    ) -> Result<StockMovement, AppError> {
        if input.new_quantity < Decimal::ZERO {
            return Err(AppError::InvalidQuantity);
        }

        let product = self.load_product(company_id, input.product_id).await?;
        let warehouse = self
            .load_warehouse(company_id, input.warehouse_id, "warehouse")
            .await?;

        let mut tx = self.pool.begin().await?;

        let record = self
            .stock_repo
            .get_or_create_for_update(&mut *tx, product.id, warehouse.id)
            .await?;

        let (movement_type, quantity) =
            adjustment_delta(record.current_quantity, input.new_quantity)?;

        // A nota carrega o antes/depois para a trilha de auditoria
        let notes = format!(
            "Ajuste: {} (de {} para {})",
            input.notes, record.current_quantity, input.new_quantity
        );

        let movement = self
            .stock_repo
            .insert_movement(
                &mut *tx,
                record.id,
                movement_type,
                quantity,
                input.new_quantity,
                MovementReason::Adjustment,
                account_id,
                None,
                None,
                Some(&notes),
                None,
                None,
            )
            .await?;
        self.stock_repo
            .set_quantity(&mut *tx, record.id, input.new_quantity)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    // --- RECONCILIAÇÃO ---
    // Ferramenta de reparo: reconstrói o saldo a partir do histórico e
    // corrige a diferença, se houver. Nunca roda implicitamente no
    // caminho normal de escrita.
    pub async fn reconcile(
        &self,
        company_id: Uuid,
        stock_record_id: Uuid,
    ) -> Result<ReconcileOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = self
            .stock_repo
            .find_scoped_for_update(&mut *tx, company_id, stock_record_id)
            .await?
            .ok_or(AppError::StockRecordNotFound)?;

        let deltas = self.stock_repo.movement_deltas(&mut *tx, record.id).await?;
        let replayed = replay_balance(&deltas);

        let reconciled = replayed != record.current_quantity;
        if reconciled {
            self.stock_repo
                .set_quantity(&mut *tx, record.id, replayed)
                .await?;
            tracing::warn!(
                "Saldo {} divergente do histórico: {} -> {}",
                record.id,
                record.current_quantity,
                replayed
            );
        }

        tx.commit().await?;

        Ok(ReconcileOutcome {
            reconciled,
            old_quantity: record.current_quantity,
            new_quantity: replayed,
            difference: replayed - record.current_quantity,
        })
    }

    // --- EXCLUSÃO DE MOVIMENTAÇÃO ---
    /// Sempre recusada: o livro-razão é append-only. Correções entram
    /// como uma movimentação de ajuste compensatória.
    pub async fn delete_movement(
        &self,
        _company_id: Uuid,
        _movement_id: Uuid,
    ) -> Result<(), AppError> {
        Err(AppError::MovementsImmutable)
    }

    // --- Leituras ---

    pub async fn list_records(&self, company_id: Uuid) -> Result<Vec<StockRecordView>, AppError> {
        self.stock_repo.list_records(company_id).await
    }

    pub async fn list_movements(
        &self,
        company_id: Uuid,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StockMovementView>, AppError> {
        self.stock_repo
            .list_movements(company_id, date_from, date_to)
            .await
    }

    pub async fn recent_movements(
        &self,
        company_id: Uuid,
        hours: i64,
        limit: i64,
    ) -> Result<Vec<StockMovementView>, AppError> {
        let cutoff = Utc::now() - Duration::hours(hours);
        self.stock_repo
            .recent_movements(company_id, cutoff, limit)
            .await
    }

    pub async fn product_movements(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<StockMovementView>, AppError> {
        // 404 antes de devolver lista vazia para produto inexistente
        self.load_product(company_id, product_id).await?;
        self.stock_repo.product_movements(company_id, product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn entrada_soma_no_saldo() {
        let result = resulting_balance(dec(0), MovementType::In, dec(30)).unwrap();
        assert_eq!(result, dec(30));
    }

    #[test]
    fn saida_subtrai_do_saldo() {
        let result = resulting_balance(dec(30), MovementType::Out, dec(5)).unwrap();
        assert_eq!(result, dec(25));
    }

    #[test]
    fn saida_pode_zerar_o_saldo() {
        let result = resulting_balance(dec(10), MovementType::Out, dec(10)).unwrap();
        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn saida_maior_que_saldo_falha_com_disponivel() {
        let err = resulting_balance(dec(10), MovementType::Out, dec(100)).unwrap_err();
        match err {
            AppError::InsufficientStock { available } => assert_eq!(available, dec(10)),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn transferencia_debita_como_saida() {
        let result = resulting_balance(dec(100), MovementType::Transfer, dec(30)).unwrap();
        assert_eq!(result, dec(70));

        let err = resulting_balance(dec(20), MovementType::Transfer, dec(30)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { .. }));
    }

    #[test]
    fn quantidade_nao_positiva_e_rejeitada() {
        assert!(matches!(
            resulting_balance(dec(10), MovementType::In, Decimal::ZERO),
            Err(AppError::InvalidQuantity)
        ));
        assert!(matches!(
            resulting_balance(dec(10), MovementType::Out, dec(-3)),
            Err(AppError::InvalidQuantity)
        ));
    }

    #[test]
    fn replay_de_historico_vazio_e_zero() {
        assert_eq!(replay_balance(&[]), Decimal::ZERO);
    }

    #[test]
    fn replay_soma_entradas_e_subtrai_saidas() {
        let history = vec![
            (MovementType::In, dec(50)),
            (MovementType::In, dec(30)),
            (MovementType::Out, dec(20)),
            (MovementType::In, dec(10)),
            (MovementType::Out, dec(15)),
        ];
        assert_eq!(replay_balance(&history), dec(55));
    }

    #[test]
    fn replay_trata_perna_de_transferencia_como_debito() {
        // Origem: entra 100, transfere 30 para fora
        let origin = vec![
            (MovementType::In, dec(100)),
            (MovementType::Transfer, dec(30)),
        ];
        assert_eq!(replay_balance(&origin), dec(70));

        // Destino: só recebe o crédito IN
        let dest = vec![(MovementType::In, dec(30))];
        assert_eq!(replay_balance(&dest), dec(30));
    }

    #[test]
    fn cenario_compra_e_venda_bate_com_o_replay() {
        // Compra 30, vende 5: saldo 25 e o replay confirma
        let after_purchase = resulting_balance(dec(0), MovementType::In, dec(30)).unwrap();
        assert_eq!(after_purchase, dec(30));

        let after_sale = resulting_balance(after_purchase, MovementType::Out, dec(5)).unwrap();
        assert_eq!(after_sale, dec(25));

        let history = vec![(MovementType::In, dec(30)), (MovementType::Out, dec(5))];
        assert_eq!(replay_balance(&history), after_sale);
    }

    #[test]
    fn ajuste_para_cima_vira_entrada() {
        let (ty, qty) = adjustment_delta(dec(40), dec(45)).unwrap();
        assert_eq!(ty, MovementType::In);
        assert_eq!(qty, dec(5));
    }

    #[test]
    fn ajuste_para_baixo_vira_saida() {
        let (ty, qty) = adjustment_delta(dec(40), dec(10)).unwrap();
        assert_eq!(ty, MovementType::Out);
        assert_eq!(qty, dec(30));
    }

    #[test]
    fn ajuste_sem_diferenca_e_rejeitado() {
        assert!(matches!(
            adjustment_delta(dec(40), dec(40)),
            Err(AppError::NoOpAdjustment)
        ));
    }
}
