// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::db::{
    AccountRepository, CatalogRepository, CompanyRepository, ProductRepository, ReportRepository,
    StockRepository, WarehouseRepository,
};
use crate::services::{
    AuthService, CatalogService, CompanyService, ProductService, ReportService, StockService,
    WarehouseService,
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub catalog_service: CatalogService,
    pub product_service: ProductService,
    pub warehouse_service: WarehouseService,
    pub stock_service: StockService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let account_repo = AccountRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let warehouse_repo = WarehouseRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(account_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let company_service = CompanyService::new(
            company_repo.clone(),
            account_repo.clone(),
            warehouse_repo.clone(),
            catalog_repo.clone(),
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(catalog_repo.clone(), db_pool.clone());
        let product_service =
            ProductService::new(product_repo.clone(), catalog_repo.clone(), db_pool.clone());
        let warehouse_service = WarehouseService::new(warehouse_repo.clone(), db_pool.clone());
        let stock_service = StockService::new(
            stock_repo.clone(),
            product_repo.clone(),
            warehouse_repo.clone(),
            db_pool.clone(),
        );
        let report_service = ReportService::new(report_repo.clone(), product_repo.clone());

        Ok(Self {
            db_pool,
            auth_service,
            company_service,
            catalog_service,
            product_service,
            warehouse_service,
            stock_service,
            report_service,
        })
    }
}
