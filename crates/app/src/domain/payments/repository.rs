//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tiffin::{payment::MaskedCard, tokens::TokenNumber};
use uuid::Uuid;

use crate::domain::{
    amounts::{price_to_i64, quantity_to_i32, try_get_amount, try_get_quantity},
    payments::{
        data::{NewPayment, NewPaymentItem},
        records::{Customer, PaymentItemRecord, PaymentRecord, PaymentUuid},
    },
    users::records::UserUuid,
};

const INSERT_PAYMENT_SQL: &str = include_str!("sql/insert_payment.sql");
const INSERT_PAYMENT_ITEM_SQL: &str = include_str!("sql/insert_payment_item.sql");
const FIND_PAYMENT_BY_IDEMPOTENCY_KEY_SQL: &str =
    include_str!("sql/find_payment_by_idempotency_key.sql");
const GET_PAYMENT_SQL: &str = include_str!("sql/get_payment.sql");
const GET_PAYMENT_BY_TOKEN_NUMBER_SQL: &str = include_str!("sql/get_payment_by_token_number.sql");
const LIST_PAYMENTS_SQL: &str = include_str!("sql/list_payments.sql");
const GET_PAYMENT_ITEMS_SQL: &str = include_str!("sql/get_payment_items.sql");

/// A payment item tagged with the payment it belongs to.
pub(crate) struct PaymentItemRow {
    pub payment_uuid: PaymentUuid,
    pub item: PaymentItemRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the payment row. Returns `None` when the user already has a
    /// payment with the same idempotency key.
    pub(crate) async fn insert_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
        card: &MaskedCard,
    ) -> Result<Option<PaymentUuid>, sqlx::Error> {
        let inserted: Option<Uuid> = query_scalar(INSERT_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.user_uuid.into_uuid())
            .bind(price_to_i64(payment.total_price)?)
            .bind(&card.card_type)
            .bind(&card.name_on_card)
            .bind(&card.last4)
            .bind(&card.expiry)
            .bind(payment.idempotency_key)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(inserted.map(PaymentUuid::from_uuid))
    }

    pub(crate) async fn insert_payment_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        position: usize,
        item: &NewPaymentItem,
    ) -> Result<(), sqlx::Error> {
        let position = i32::try_from(position).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query(INSERT_PAYMENT_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(payment.into_uuid())
            .bind(position)
            .bind(&item.food_name)
            .bind(quantity_to_i32(item.quantity)?)
            .bind(price_to_i64(item.price)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_payment_by_idempotency_key(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        idempotency_key: Uuid,
    ) -> Result<PaymentUuid, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(FIND_PAYMENT_BY_IDEMPOTENCY_KEY_SQL)
            .bind(user.into_uuid())
            .bind(idempotency_key)
            .fetch_one(&mut **tx)
            .await
            .map(PaymentUuid::from_uuid)
    }

    pub(crate) async fn get_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment_by_token_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_number: TokenNumber,
    ) -> Result<PaymentRecord, sqlx::Error> {
        let token_number =
            i64::try_from(token_number.get()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_BY_TOKEN_NUMBER_SQL)
            .bind(token_number)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_payments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(LIST_PAYMENTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payments: &[PaymentUuid],
    ) -> Result<Vec<PaymentItemRow>, sqlx::Error> {
        let uuids: Vec<Uuid> = payments.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, PaymentItemRow>(GET_PAYMENT_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let token_number: i64 = row.try_get("token_number")?;

        let token_number =
            u64::try_from(token_number).map_err(|e| sqlx::Error::ColumnDecode {
                index: "token_number".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            token_number: TokenNumber::new(token_number),
            customer: Customer {
                uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
                username: row.try_get("username")?,
                email: row.try_get("email")?,
            },
            items: Vec::new(),
            total_price: try_get_amount(row, "total_price")?,
            card: MaskedCard {
                card_type: row.try_get("card_type")?,
                name_on_card: row.try_get("name_on_card")?,
                last4: row.try_get("card_last4")?,
                expiry: row.try_get("expiry")?,
            },
            idempotency_key: row.try_get("idempotency_key")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            payment_uuid: PaymentUuid::from_uuid(row.try_get("payment_uuid")?),
            item: PaymentItemRecord {
                food_name: row.try_get("food_name")?,
                quantity: try_get_quantity(row, "quantity")?,
                price: try_get_amount(row, "price")?,
            },
        })
    }
}
