// src/services/pos_service.rs

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::{InventoryRepository, SalesRepository},
    models::sales::{CartLine, SaleWithItems},
};

#[derive(Clone)]
pub struct PosService {
    inventory_repo: InventoryRepository,
    sales_repo: SalesRepository,
}

impl PosService {
    pub fn new(inventory_repo: InventoryRepository, sales_repo: SalesRepository) -> Self {
        Self {
            inventory_repo,
            sales_repo,
        }
    }

    // --- FINALIZAÇÃO DE VENDA ---
    // Converte o carrinho em uma venda durável e marca cada exemplar como
    // vendido, tudo-ou-nada. Qualquer falha desfaz a transação inteira:
    // nenhum exemplar fica vendido pela metade, nenhuma venda órfã.
    pub async fn finalize_sale<'e, E>(
        &self,
        executor: E,
        items: &[CartLine],
        sold_party_name: Option<&str>,
        sold_party_contact: Option<&str>,
    ) -> Result<SaleWithItems, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        if items.is_empty() {
            return Err(AppError::InvalidCart(
                "A venda precisa de ao menos um exemplar.".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for line in items {
            if line.price.is_sign_negative() {
                return Err(AppError::InvalidCart(
                    "Preço de item não pode ser negativo.".to_string(),
                ));
            }
            if !seen.insert(line.book_copy_id) {
                return Err(AppError::InvalidCart(format!(
                    "Exemplar repetido no carrinho: {}.",
                    line.book_copy_id
                )));
            }
        }

        let mut tx = executor.begin().await?;

        // 1 e 2. Resolve todos os exemplares e confere disponibilidade.
        // Falha nomeando o código do exemplar ofensor, sem venda parcial.
        let mut copies = Vec::with_capacity(items.len());
        for line in items {
            let copy = self
                .inventory_repo
                .find_copy(&mut *tx, line.book_copy_id)
                .await?
                .ok_or(AppError::BookCopyNotFound(line.book_copy_id))?;
            if copy.is_sold {
                return Err(AppError::AlreadySold(copy.book_code));
            }
            copies.push(copy);
        }

        // 3. Totais. Imposto é política fixa (zero), não tabela de alíquota.
        let subtotal: Decimal = items.iter().map(|line| line.price).sum();
        let tax = Decimal::ZERO;
        let total = subtotal + tax;

        // 4. Venda + itens + baixa dos exemplares, na mesma transação.
        let sale = self
            .sales_repo
            .create_sale(
                &mut *tx,
                Utc::now(),
                subtotal,
                tax,
                total,
                sold_party_name,
                sold_party_contact,
            )
            .await?;

        let mut sale_items = Vec::with_capacity(items.len());
        for (line, copy) in items.iter().zip(&copies) {
            let item = self
                .sales_repo
                .create_sale_item(&mut *tx, sale.id, line.book_copy_id, line.price)
                .await?;

            // UPDATE condicional: só marca se ainda estiver disponível.
            // Zero linhas afetadas = outro caixa vendeu no meio do caminho.
            let updated = self
                .inventory_repo
                .mark_copy_sold(&mut *tx, line.book_copy_id)
                .await?;
            if updated == 0 {
                return Err(AppError::AlreadySold(copy.book_code.clone()));
            }
            sale_items.push(item);
        }

        tx.commit().await?;

        // 5. Devolve a venda persistida com os itens, para o recibo.
        Ok(SaleWithItems {
            sale,
            items: sale_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CatalogRepository, DonorRepository, InventoryRepository, SalesRepository};
    use crate::models::inventory::{BookCondition, BookCopy};
    use crate::services::intake_service::IntakeService;
    use rust_decimal::Decimal;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;
    use uuid::Uuid;

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    struct Fixture {
        pool: SqlitePool,
        pos: PosService,
        intake: IntakeService,
        inventory: InventoryRepository,
        author_id: Uuid,
        language_id: Uuid,
        category_id: Uuid,
        donor_id: Uuid,
    }

    async fn setup() -> Fixture {
        let pool = test_pool().await;
        let catalog = CatalogRepository::new(pool.clone());
        let donors = DonorRepository::new(pool.clone());
        let inventory = InventoryRepository::new(pool.clone());
        let sales = SalesRepository::new(pool.clone());
        let intake = IntakeService::new(catalog.clone(), donors.clone(), inventory.clone());
        let pos = PosService::new(inventory.clone(), sales);

        let author = catalog.create_author(&pool, "Tolkien").await.unwrap();
        let language = catalog.create_language(&pool, "Português").await.unwrap();
        let category = catalog.create_category(&pool, "Fantasia").await.unwrap();
        let donor = donors
            .create_donor(&pool, "501", "Maria", None, None, None)
            .await
            .unwrap();

        Fixture {
            pool,
            pos,
            intake,
            inventory,
            author_id: author.id,
            language_id: language.id,
            category_id: category.id,
            donor_id: donor.id,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn novo_exemplar(fx: &Fixture, title: &str) -> BookCopy {
        fx.intake
            .assign_identity(
                &fx.pool,
                title,
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                fx.donor_id,
                BookCondition::Good,
                None,
                dec("2.00"),
                dec("10.00"),
                false,
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn venda_de_dois_exemplares_calcula_totais_e_baixa_os_dois() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;
        let b = novo_exemplar(&fx, "O Silmarillion").await;

        let result = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[
                    CartLine { book_copy_id: a.id, price: dec("12.99") },
                    CartLine { book_copy_id: b.id, price: dec("8.50") },
                ],
                Some("Cliente Balcão"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.sale.subtotal, dec("21.49"));
        assert_eq!(result.sale.tax, Decimal::ZERO);
        assert_eq!(result.sale.total, dec("21.49"));
        assert_eq!(result.items.len(), 2);
        // total == subtotal + tax, e subtotal == soma dos itens
        let soma: Decimal = result.items.iter().map(|i| i.price_at_sale).sum();
        assert_eq!(result.sale.subtotal, soma);
        assert_eq!(result.sale.total, result.sale.subtotal + result.sale.tax);

        for id in [a.id, b.id] {
            let copy = fx.inventory.find_copy(&fx.pool, id).await.unwrap().unwrap();
            assert!(copy.is_sold);
        }
    }

    #[tokio::test]
    async fn preco_do_caixa_prevalece_sobre_o_preco_de_etiqueta() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;

        let result = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[CartLine { book_copy_id: a.id, price: dec("7.77") }],
                None,
                None,
            )
            .await
            .unwrap();

        // selling_price era 10.00; o caixa deu desconto.
        assert_eq!(result.items[0].price_at_sale, dec("7.77"));
        assert_eq!(result.sale.total, dec("7.77"));
    }

    #[tokio::test]
    async fn exemplar_ja_vendido_aborta_a_venda_inteira() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;
        let b = novo_exemplar(&fx, "O Silmarillion").await;

        // Vende `a` primeiro.
        fx.pos
            .finalize_sale(
                &fx.pool,
                &[CartLine { book_copy_id: a.id, price: dec("10.00") }],
                None,
                None,
            )
            .await
            .unwrap();

        // Carrinho com `a` (vendido) e `b` (disponível) falha por inteiro.
        let err = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[
                    CartLine { book_copy_id: b.id, price: dec("10.00") },
                    CartLine { book_copy_id: a.id, price: dec("10.00") },
                ],
                None,
                None,
            )
            .await
            .unwrap_err();
        match err {
            AppError::AlreadySold(code) => assert_eq!(code, a.book_code),
            other => panic!("esperava AlreadySold, veio {:?}", other),
        }

        // `b` continua disponível: nada foi aplicado pela metade.
        let b_after = fx.inventory.find_copy(&fx.pool, b.id).await.unwrap().unwrap();
        assert!(!b_after.is_sold);
    }

    #[tokio::test]
    async fn falha_nao_deixa_venda_nem_itens_no_banco() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;

        let err = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[
                    CartLine { book_copy_id: a.id, price: dec("10.00") },
                    CartLine { book_copy_id: Uuid::new_v4(), price: dec("5.00") },
                ],
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookCopyNotFound(_)));

        let (sales_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
            .fetch_one(&fx.pool)
            .await
            .unwrap();
        let (items_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&fx.pool)
            .await
            .unwrap();
        assert_eq!(sales_count, 0);
        assert_eq!(items_count, 0);

        let a_after = fx.inventory.find_copy(&fx.pool, a.id).await.unwrap().unwrap();
        assert!(!a_after.is_sold);
    }

    #[tokio::test]
    async fn duas_vendas_concorrentes_do_mesmo_exemplar_uma_ganha() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;
        let cart = [CartLine { book_copy_id: a.id, price: dec("10.00") }];

        let (r1, r2) = tokio::join!(
            fx.pos.finalize_sale(&fx.pool, &cart, None, None),
            fx.pos.finalize_sale(&fx.pool, &cart, None, None),
        );

        let oks = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(oks, 1, "exatamente um caixa deve ganhar a corrida");
        let err = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
        assert!(matches!(err, AppError::AlreadySold(_)));

        let (sales_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
            .fetch_one(&fx.pool)
            .await
            .unwrap();
        assert_eq!(sales_count, 1);
    }

    #[tokio::test]
    async fn carrinho_vazio_e_rejeitado() {
        let fx = setup().await;
        let err = fx.pos.finalize_sale(&fx.pool, &[], None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCart(_)));
    }

    #[tokio::test]
    async fn exemplar_repetido_no_carrinho_e_rejeitado() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;
        let err = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[
                    CartLine { book_copy_id: a.id, price: dec("10.00") },
                    CartLine { book_copy_id: a.id, price: dec("10.00") },
                ],
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCart(_)));

        let a_after = fx.inventory.find_copy(&fx.pool, a.id).await.unwrap().unwrap();
        assert!(!a_after.is_sold);
    }

    #[tokio::test]
    async fn preco_negativo_e_rejeitado() {
        let fx = setup().await;
        let a = novo_exemplar(&fx, "O Hobbit").await;
        let err = fx
            .pos
            .finalize_sale(
                &fx.pool,
                &[CartLine { book_copy_id: a.id, price: dec("-1.00") }],
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCart(_)));
    }
}
