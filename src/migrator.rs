use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240101_000002_create_pricing_tables::Migration),
            Box::new(m20240101_000003_create_quotation_tables::Migration),
            Box::new(m20240101_000004_create_users_table::Migration),
        ]
    }
}

// Foreign keys carry no ON DELETE action: services remove dependents
// explicitly, in order, inside one transaction.

mod m20240101_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Grades::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Grades::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Grades::TypeCode).string().not_null())
                        .col(ColumnDef::new(Grades::CategoryId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_grades_category_id")
                                .from(Grades::Table, Grades::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_grades_category_type_code")
                        .table(Grades::Table)
                        .col(Grades::CategoryId)
                        .col(Grades::TypeCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::ProductName).string().not_null())
                        .col(ColumnDef::new(Products::Description).text().null())
                        .col(ColumnDef::new(Products::CategoryName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductDetails::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ProductDetails::Series).string().not_null())
                        .col(ColumnDef::new(ProductDetails::GradeId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_details_grade_id")
                                .from(ProductDetails::Table, ProductDetails::GradeId)
                                .to(Grades::Table, Grades::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_details_grade_series")
                        .table(ProductDetails::Table)
                        .col(ProductDetails::GradeId)
                        .col(ProductDetails::Series)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Thicknesses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Thicknesses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Thicknesses::Thickness)
                                .decimal_len(10, 2)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Sizes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sizes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Sizes::Length).integer().not_null())
                        .col(ColumnDef::new(Sizes::Breadth).integer().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sizes_length_breadth")
                        .table(Sizes::Table)
                        .col(Sizes::Length)
                        .col(Sizes::Breadth)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sizes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Thicknesses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Grades::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Grades {
        Table,
        Id,
        TypeCode,
        CategoryId,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        ProductName,
        Description,
        CategoryName,
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductDetails {
        Table,
        Id,
        Series,
        GradeId,
    }

    #[derive(DeriveIden)]
    pub(super) enum Thicknesses {
        Table,
        Id,
        Thickness,
    }

    #[derive(DeriveIden)]
    pub(super) enum Sizes {
        Table,
        Id,
        Length,
        Breadth,
    }
}

mod m20240101_000002_create_pricing_tables {
    use super::m20240101_000001_create_catalog_tables::{ProductDetails, Sizes, Thicknesses};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_pricing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductPrices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::ProductDetailId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductPrices::ThicknessId).integer().not_null())
                        .col(ColumnDef::new(ProductPrices::SizeId).integer().not_null())
                        .col(
                            ColumnDef::new(ProductPrices::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_prices_product_detail_id")
                                .from(ProductPrices::Table, ProductPrices::ProductDetailId)
                                .to(ProductDetails::Table, ProductDetails::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_prices_thickness_id")
                                .from(ProductPrices::Table, ProductPrices::ThicknessId)
                                .to(Thicknesses::Table, Thicknesses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_prices_size_id")
                                .from(ProductPrices::Table, ProductPrices::SizeId)
                                .to(Sizes::Table, Sizes::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_product_prices_detail_thickness_size")
                        .table(ProductPrices::Table)
                        .col(ProductPrices::ProductDetailId)
                        .col(ProductPrices::ThicknessId)
                        .col(ProductPrices::SizeId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CartItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CartItems::ProductPriceId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(CartItems::TotalPrice)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(CartItems::Discount).decimal_len(5, 2).null())
                        .col(
                            ColumnDef::new(CartItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CartItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cart_items_product_price_id")
                                .from(CartItems::Table, CartItems::ProductPriceId)
                                .to(ProductPrices::Table, ProductPrices::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CartItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductPrices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ProductPrices {
        Table,
        Id,
        ProductDetailId,
        ThicknessId,
        SizeId,
        Price,
    }

    #[derive(DeriveIden)]
    enum CartItems {
        Table,
        Id,
        ProductPriceId,
        Quantity,
        TotalPrice,
        Discount,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_quotation_tables {
    use super::m20240101_000001_create_catalog_tables::{ProductDetails, Sizes, Thicknesses};
    use super::m20240101_000002_create_pricing_tables::ProductPrices;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_quotation_tables"
        }
    }

    fn money(col: impl IntoIden) -> ColumnDef {
        ColumnDef::new(col).decimal_len(10, 2).not_null().to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FullSheetQuotations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FullSheetQuotations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(FullSheetQuotations::Series).string().not_null())
                        .col(money(FullSheetQuotations::Thickness))
                        .col(ColumnDef::new(FullSheetQuotations::Size).string().not_null())
                        .col(ColumnDef::new(FullSheetQuotations::Quantity).integer().not_null())
                        .col(money(FullSheetQuotations::BasePrice))
                        .col(money(FullSheetQuotations::TotalPrice))
                        .col(
                            ColumnDef::new(FullSheetQuotations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FullSheetQuotations::ProductDetailId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FullSheetQuotations::ThicknessId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FullSheetQuotations::SizeId).integer().not_null())
                        .col(
                            ColumnDef::new(FullSheetQuotations::ProductPriceId)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_full_sheet_quotations_product_detail_id")
                                .from(
                                    FullSheetQuotations::Table,
                                    FullSheetQuotations::ProductDetailId,
                                )
                                .to(ProductDetails::Table, ProductDetails::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_full_sheet_quotations_thickness_id")
                                .from(FullSheetQuotations::Table, FullSheetQuotations::ThicknessId)
                                .to(Thicknesses::Table, Thicknesses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_full_sheet_quotations_size_id")
                                .from(FullSheetQuotations::Table, FullSheetQuotations::SizeId)
                                .to(Sizes::Table, Sizes::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_full_sheet_quotations_product_price_id")
                                .from(
                                    FullSheetQuotations::Table,
                                    FullSheetQuotations::ProductPriceId,
                                )
                                .to(ProductPrices::Table, ProductPrices::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_full_sheet_quotations_created_at")
                        .table(FullSheetQuotations::Table)
                        .col(FullSheetQuotations::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CutToSizeQuotations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CutToSizeQuotations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CutToSizeQuotations::Series).string().not_null())
                        .col(money(CutToSizeQuotations::Thickness))
                        .col(
                            ColumnDef::new(CutToSizeQuotations::SizeFullSheet)
                                .string()
                                .not_null(),
                        )
                        .col(money(CutToSizeQuotations::CutLength))
                        .col(money(CutToSizeQuotations::CutWidth))
                        .col(money(CutToSizeQuotations::MachiningCost))
                        .col(money(CutToSizeQuotations::CutSizeArea))
                        .col(
                            ColumnDef::new(CutToSizeQuotations::QuantityPerSheet)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CutToSizeQuotations::NumFullSheetsRequired)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CutToSizeQuotations::Quantity).integer().not_null())
                        .col(money(CutToSizeQuotations::BasePriceFullSheet))
                        .col(money(CutToSizeQuotations::CutToSizePricePerUnit))
                        .col(money(CutToSizeQuotations::TotalCalculatedPrice))
                        .col(
                            ColumnDef::new(CutToSizeQuotations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CutToSizeQuotations::ProductDetailId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CutToSizeQuotations::ProductPriceId)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cut_to_size_quotations_product_detail_id")
                                .from(
                                    CutToSizeQuotations::Table,
                                    CutToSizeQuotations::ProductDetailId,
                                )
                                .to(ProductDetails::Table, ProductDetails::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cut_to_size_quotations_product_price_id")
                                .from(
                                    CutToSizeQuotations::Table,
                                    CutToSizeQuotations::ProductPriceId,
                                )
                                .to(ProductPrices::Table, ProductPrices::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cut_to_size_quotations_created_at")
                        .table(CutToSizeQuotations::Table)
                        .col(CutToSizeQuotations::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CutToSizeQuotations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FullSheetQuotations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FullSheetQuotations {
        Table,
        Id,
        Series,
        Thickness,
        Size,
        Quantity,
        BasePrice,
        TotalPrice,
        CreatedAt,
        ProductDetailId,
        ThicknessId,
        SizeId,
        ProductPriceId,
    }

    #[derive(DeriveIden)]
    enum CutToSizeQuotations {
        Table,
        Id,
        Series,
        Thickness,
        SizeFullSheet,
        CutLength,
        CutWidth,
        MachiningCost,
        CutSizeArea,
        QuantityPerSheet,
        NumFullSheetsRequired,
        Quantity,
        BasePriceFullSheet,
        CutToSizePricePerUnit,
        TotalCalculatedPrice,
        CreatedAt,
        ProductDetailId,
        ProductPriceId,
    }
}

mod m20240101_000004_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        Role,
        CreatedAt,
    }
}
