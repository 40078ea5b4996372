// src/services/intake_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Sqlite};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, DonorRepository, InventoryRepository},
    models::inventory::{BookCondition, BookCopy},
};

#[derive(Clone)]
pub struct IntakeService {
    catalog_repo: CatalogRepository,
    donor_repo: DonorRepository,
    inventory_repo: InventoryRepository,
}

impl IntakeService {
    pub fn new(
        catalog_repo: CatalogRepository,
        donor_repo: DonorRepository,
        inventory_repo: InventoryRepository,
    ) -> Self {
        Self {
            catalog_repo,
            donor_repo,
            inventory_repo,
        }
    }

    /// Monta o código de livro: book_id + donor_code + serial com 4 dígitos,
    /// sem separador. Ex.: "1000" + "501" + 1 -> "10005010001".
    fn derive_book_code(book_id: &str, donor_code: &str, serial_number: i64) -> String {
        format!("{}{}{:04}", book_id, donor_code, serial_number)
    }

    // --- INTAKE (ATRIBUIÇÃO DE IDENTIDADE) ---
    // Transforma o formulário de entrada em um exemplar persistido com
    // identidade livre de colisão. Tudo roda numa transação só:
    // autor novo, find-or-create do título, serial e inserção do exemplar
    // entram juntos ou não entram.
    #[allow(clippy::too_many_arguments)]
    pub async fn assign_identity<'e, E>(
        &self,
        executor: E,
        title: &str,
        author_id: Option<Uuid>,
        new_author_name: Option<&str>,
        language_id: Uuid,
        category_id: Uuid,
        donor_id: Uuid,
        condition: BookCondition,
        shelf_location: Option<&str>,
        buying_price: Decimal,
        selling_price: Decimal,
        is_free_donation: bool,
        note: Option<&str>,
    ) -> Result<BookCopy, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        // Regras de preço: doação gratuita zera o custo, senão o preço de
        // venda precisa cobrir o de compra.
        let buying_price = if is_free_donation {
            Decimal::ZERO
        } else {
            buying_price
        };
        if !is_free_donation && selling_price < buying_price {
            return Err(AppError::SellingPriceBelowCost);
        }

        let mut tx = executor.begin().await?;

        // 1. Autor: reusa o existente ou cria um novo a partir do nome.
        let author_id = match (author_id, new_author_name) {
            (Some(id), _) => {
                self.catalog_repo
                    .find_author(&mut *tx, id)
                    .await?
                    .ok_or(AppError::LookupNotFound("autor"))?;
                id
            }
            (None, Some(name)) if !name.trim().is_empty() => {
                self.catalog_repo.create_author(&mut *tx, name.trim()).await?.id
            }
            _ => return Err(AppError::AuthorRequired),
        };

        self.catalog_repo
            .find_language(&mut *tx, language_id)
            .await?
            .ok_or(AppError::LookupNotFound("idioma"))?;
        self.catalog_repo
            .find_category(&mut *tx, category_id)
            .await?
            .ok_or(AppError::LookupNotFound("categoria"))?;

        // 2. Find-or-create do título de catálogo (chave lógica:
        // título case-insensitive + autor + idioma + categoria).
        let book_title = match self
            .catalog_repo
            .find_title_by_identity(&mut *tx, title, author_id, language_id, category_id)
            .await?
        {
            Some(existing) => existing,
            None => {
                let next_book_id = self.catalog_repo.next_book_id(&mut *tx).await?;
                // Se outro intake criar o mesmo título entre a busca e o
                // insert, o índice único derruba este aqui com DuplicateTitle.
                self.catalog_repo
                    .create_title(
                        &mut *tx,
                        &next_book_id,
                        title,
                        author_id,
                        language_id,
                        category_id,
                    )
                    .await?
            }
        };

        // 3. Serial: contagem de exemplares do título + 1, dentro da
        // transação. Dois intakes do mesmo título nunca recebem o mesmo
        // serial; se a transação furar, a UNIQUE de book_code acusa.
        let copy_count = self
            .inventory_repo
            .count_copies_for_title(&mut *tx, book_title.id)
            .await?;
        let serial_number = copy_count + 1;

        // 4. Doador precisa existir; o código dele entra na etiqueta.
        let donor = self
            .donor_repo
            .find_donor(&mut *tx, donor_id)
            .await?
            .ok_or(AppError::DonorNotFound)?;

        // 5. Código derivado, sem checksum: a unicidade vem da tripla
        // (book_id, donor_code, serial).
        let book_code = Self::derive_book_code(&book_title.book_id, &donor.donor_code, serial_number);

        // 6. Persiste o exemplar disponível para venda.
        let copy = self
            .inventory_repo
            .create_copy(
                &mut *tx,
                book_title.id,
                donor.id,
                shelf_location,
                condition,
                buying_price,
                selling_price,
                is_free_donation,
                note,
                serial_number,
                &book_code,
            )
            .await?;

        tx.commit().await?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CatalogRepository, DonorRepository, InventoryRepository};
    use rust_decimal::Decimal;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

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
        service: IntakeService,
        catalog: CatalogRepository,
        donors: DonorRepository,
        author_id: uuid::Uuid,
        language_id: uuid::Uuid,
        category_id: uuid::Uuid,
        donor_id: uuid::Uuid,
    }

    async fn setup() -> Fixture {
        let pool = test_pool().await;
        let catalog = CatalogRepository::new(pool.clone());
        let donors = DonorRepository::new(pool.clone());
        let inventory = InventoryRepository::new(pool.clone());
        let service =
            IntakeService::new(catalog.clone(), donors.clone(), inventory.clone());

        let author = catalog.create_author(&pool, "Tolkien").await.unwrap();
        let language = catalog.create_language(&pool, "Português").await.unwrap();
        let category = catalog.create_category(&pool, "Fantasia").await.unwrap();
        let donor = donors
            .create_donor(&pool, "501", "Maria", None, None, None)
            .await
            .unwrap();

        Fixture {
            pool,
            service,
            catalog,
            donors,
            author_id: author.id,
            language_id: language.id,
            category_id: category.id,
            donor_id: donor.id,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn intake_simples(fx: &Fixture, title: &str, donor_id: uuid::Uuid) -> BookCopy {
        fx.service
            .assign_identity(
                &fx.pool,
                title,
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                donor_id,
                BookCondition::Good,
                Some("A-3"),
                dec("5.00"),
                dec("12.99"),
                false,
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn primeiro_exemplar_de_catalogo_vazio_usa_semente_1000() {
        let fx = setup().await;
        let copy = intake_simples(&fx, "O Hobbit", fx.donor_id).await;

        assert_eq!(copy.serial_number, 1);
        assert_eq!(copy.book_code, "10005010001");
        assert!(!copy.is_sold);
    }

    #[tokio::test]
    async fn segundo_exemplar_reusa_titulo_e_incrementa_serial() {
        let fx = setup().await;
        let first = intake_simples(&fx, "O Hobbit", fx.donor_id).await;

        // Mesmo título lógico (case-insensitive), outro doador.
        let donor2 = fx
            .donors
            .create_donor(&fx.pool, "502", "João", None, None, None)
            .await
            .unwrap();
        let second = fx
            .service
            .assign_identity(
                &fx.pool,
                "o hobbit",
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                donor2.id,
                BookCondition::Medium,
                None,
                dec("3.00"),
                dec("9.50"),
                false,
                None,
            )
            .await
            .unwrap();

        assert_eq!(second.book_title_id, first.book_title_id);
        assert_eq!(second.serial_number, 2);
        assert_eq!(second.book_code, "10005020002");
        assert_ne!(second.book_code, first.book_code);
    }

    #[tokio::test]
    async fn titulos_diferentes_recebem_book_ids_sequenciais() {
        let fx = setup().await;
        let a = intake_simples(&fx, "O Hobbit", fx.donor_id).await;
        let b = intake_simples(&fx, "O Silmarillion", fx.donor_id).await;

        let titles = fx.catalog.get_all_titles(&fx.pool).await.unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].book_id, "1000");
        assert_eq!(titles[1].book_id, "1001");
        assert_ne!(a.book_code, b.book_code);
        // Serial reinicia por título.
        assert_eq!(b.serial_number, 1);
    }

    #[tokio::test]
    async fn seriais_sao_contiguos_e_codigos_unicos() {
        let fx = setup().await;
        let mut codes = std::collections::HashSet::new();
        for expected_serial in 1..=5 {
            let copy = intake_simples(&fx, "O Hobbit", fx.donor_id).await;
            assert_eq!(copy.serial_number, expected_serial);
            assert!(codes.insert(copy.book_code.clone()), "código repetido");
        }
    }

    #[tokio::test]
    async fn autor_novo_e_criado_junto_com_o_exemplar() {
        let fx = setup().await;
        let copy = fx
            .service
            .assign_identity(
                &fx.pool,
                "Grande Sertão: Veredas",
                None,
                Some("Guimarães Rosa"),
                fx.language_id,
                fx.category_id,
                fx.donor_id,
                BookCondition::New,
                None,
                dec("10.00"),
                dec("25.00"),
                false,
                None,
            )
            .await
            .unwrap();
        assert_eq!(copy.serial_number, 1);

        let authors = fx.catalog.get_all_authors(&fx.pool).await.unwrap();
        assert!(authors.iter().any(|a| a.name == "Guimarães Rosa"));
    }

    #[tokio::test]
    async fn sem_autor_e_sem_nome_novo_falha() {
        let fx = setup().await;
        let err = fx
            .service
            .assign_identity(
                &fx.pool,
                "O Hobbit",
                None,
                None,
                fx.language_id,
                fx.category_id,
                fx.donor_id,
                BookCondition::Good,
                None,
                dec("1.00"),
                dec("2.00"),
                false,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorRequired));
    }

    #[tokio::test]
    async fn doador_inexistente_falha_sem_criar_nada() {
        let fx = setup().await;
        let err = fx
            .service
            .assign_identity(
                &fx.pool,
                "O Hobbit",
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                uuid::Uuid::new_v4(),
                BookCondition::Good,
                None,
                dec("1.00"),
                dec("2.00"),
                false,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DonorNotFound));

        // A transação desfez o find-or-create do título.
        let titles = fx.catalog.get_all_titles(&fx.pool).await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn doacao_gratuita_zera_preco_de_compra() {
        let fx = setup().await;
        let copy = fx
            .service
            .assign_identity(
                &fx.pool,
                "O Hobbit",
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                fx.donor_id,
                BookCondition::Poor,
                None,
                dec("99.00"), // ignorado: doação gratuita
                dec("4.50"),
                true,
                None,
            )
            .await
            .unwrap();
        assert_eq!(copy.buying_price, Decimal::ZERO);
        assert_eq!(copy.selling_price, dec("4.50"));
        assert!(copy.is_free_donation);
    }

    #[tokio::test]
    async fn preco_de_venda_abaixo_do_custo_falha() {
        let fx = setup().await;
        let err = fx
            .service
            .assign_identity(
                &fx.pool,
                "O Hobbit",
                Some(fx.author_id),
                None,
                fx.language_id,
                fx.category_id,
                fx.donor_id,
                BookCondition::Good,
                None,
                dec("10.00"),
                dec("5.00"),
                false,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SellingPriceBelowCost));
    }

    #[tokio::test]
    async fn idioma_inexistente_falha() {
        let fx = setup().await;
        let err = fx
            .service
            .assign_identity(
                &fx.pool,
                "O Hobbit",
                Some(fx.author_id),
                None,
                uuid::Uuid::new_v4(),
                fx.category_id,
                fx.donor_id,
                BookCondition::Good,
                None,
                dec("1.00"),
                dec("2.00"),
                false,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LookupNotFound("idioma")));
    }
}
