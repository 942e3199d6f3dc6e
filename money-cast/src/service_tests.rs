//! CastService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use money_types::{
        Attributes, BigInt, CastBinding, CastError, CurrencyCode, CurrencyRegistry, DomainError,
        ModelSchema, MoneyInput, MoneyParser, RecordId, RecordStore, RepoError, StoredValue,
    };

    use crate::{CastService, MoneyCaster};

    /// Simple in-memory store for testing the service layer.
    pub struct MockStore {
        rows: Mutex<HashMap<(String, RecordId), Attributes>>,
        next_id: Mutex<RecordId>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                next_id: Mutex::new(1),
            }
        }

        fn row(&self, table: &str, id: RecordId) -> Option<Attributes> {
            self.rows
                .lock()
                .unwrap()
                .get(&(table.to_string(), id))
                .cloned()
        }
    }

    #[async_trait]
    impl RecordStore for MockStore {
        async fn prepare(&self, _schema: &ModelSchema) -> Result<(), RepoError> {
            Ok(())
        }

        async fn insert(
            &self,
            schema: &ModelSchema,
            attributes: &Attributes,
        ) -> Result<RecordId, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            self.rows
                .lock()
                .unwrap()
                .insert((schema.table().to_string(), id), attributes.clone());
            Ok(id)
        }

        async fn update(
            &self,
            schema: &ModelSchema,
            id: RecordId,
            attributes: &Attributes,
        ) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .get_mut(&(schema.table().to_string(), id))
                .ok_or(RepoError::NotFound)?;
            row.extend(attributes.clone());
            Ok(())
        }

        async fn find(
            &self,
            schema: &ModelSchema,
            id: RecordId,
        ) -> Result<Option<Attributes>, RepoError> {
            Ok(self.row(schema.table(), id))
        }
    }

    fn registry() -> Arc<CurrencyRegistry> {
        let mut registry = CurrencyRegistry::new();
        registry.register("USD", 2, "$").unwrap();
        registry.register("AUD", 2, "A$").unwrap();
        registry.register("CAD", 2, "CA$").unwrap();
        registry.register("EUR", 2, "€").unwrap();
        registry.register("JPY", 0, "¥").unwrap();
        registry.register("XBT", 8, "Ƀ").unwrap();
        Arc::new(registry)
    }

    fn service() -> CastService<MockStore> {
        let caster = MoneyCaster::new(MoneyParser::new(registry()), "USD").unwrap();
        CastService::new(MockStore::new(), caster)
    }

    fn user_schema() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::new("User", "users")
                .cast("money", CastBinding::formatted())
                .cast(
                    "wage",
                    CastBinding::minor_units().with_currency(CurrencyCode::new("EUR").unwrap()),
                )
                .cast("debits", CastBinding::decimal().with_currency_column("currency"))
                .cast("credits", CastBinding::decimal()),
        )
    }

    fn raw_row() -> Attributes {
        Attributes::from([
            ("money".to_string(), StoredValue::from("1234.56")),
            ("wage".to_string(), StoredValue::Integer(5000000)),
            ("debits".to_string(), StoredValue::Null),
            ("credits".to_string(), StoredValue::Real(12.00)),
            ("currency".to_string(), StoredValue::from("AUD")),
        ])
    }

    fn text(value: &str) -> StoredValue {
        StoredValue::from(value)
    }

    #[tokio::test]
    async fn test_find_missing_record() {
        let service = service();
        let schema = user_schema();

        let result = service.find(&schema, 42).await;
        assert!(matches!(
            result,
            Err(CastError::NotFound { model, id }) if model == "User" && id == 42
        ));
    }

    #[tokio::test]
    async fn test_reads_and_writes_stored_record() {
        let service = service();
        let schema = user_schema();
        let id = service.store().insert(&schema, &raw_row()).await.unwrap();

        let mut user = service.find(&schema, id).await.unwrap();

        let money = user.money("money").unwrap().unwrap();
        assert_eq!(money.amount(), &BigInt::from(123456));
        assert_eq!(money.format(), "$1,234.56");
        assert_eq!(money.currency_code().as_str(), "USD");

        let wage = user.money("wage").unwrap().unwrap();
        assert_eq!(wage.amount(), &BigInt::from(5000000));
        assert_eq!(wage.format(), "€50,000.00");
        assert_eq!(wage.currency_code().as_str(), "EUR");

        assert_eq!(user.money("debits").unwrap(), None);

        let credits = user.money("credits").unwrap().unwrap();
        assert_eq!(credits.amount(), &BigInt::from(1200));
        assert_eq!(credits.format(), "$12.00");

        let caster = service.caster();
        caster.set(&mut user, "debits", 100.99).unwrap();
        let debits = user.money("debits").unwrap().unwrap();
        assert_eq!(debits.amount(), &BigInt::from(10099));
        assert_eq!(debits.format(), "A$100.99");
        assert_eq!(debits.currency_code().as_str(), "AUD");

        caster.set(&mut user, "credits", "$99").unwrap();
        let credits = user.money("credits").unwrap().unwrap();
        assert_eq!(credits.amount(), &BigInt::from(9900));
        assert_eq!(credits.format(), "$99.00");

        assert_eq!(service.save(&mut user).await.unwrap(), id);

        let row = service.store().row("users", id).unwrap();
        assert_eq!(row["money"], text("$1,234.56"));
        assert_eq!(row["wage"], StoredValue::Integer(5000000));
        assert_eq!(row["debits"], text("100.99"));
        assert_eq!(row["credits"], text("99.00"));
        assert_eq!(row["currency"], text("AUD"));
    }

    #[tokio::test]
    async fn test_fills_and_saves_new_record() {
        let service = service();
        let schema = user_schema();
        let caster = service.caster();
        let mut user = service.make(&schema);

        caster
            .fill(
                &mut user,
                [
                    ("money", MoneyInput::from(0)),
                    ("wage", MoneyInput::from("65000.00")),
                    ("debits", MoneyInput::Null),
                    ("currency", MoneyInput::from("CAD")),
                ],
            )
            .unwrap();

        let money = user.money("money").unwrap().unwrap();
        assert_eq!(money.amount().to_string(), "0");
        assert_eq!(money.format(), "$0.00");
        assert_eq!(money.currency_code().as_str(), "USD");

        let wage = user.money("wage").unwrap().unwrap();
        assert_eq!(wage.amount(), &BigInt::from(6500000));
        assert_eq!(wage.format(), "€65,000.00");

        let hundred = caster.parser().registry().money(10000, "USD").unwrap();
        caster.set(&mut user, "money", hundred).unwrap();
        assert_eq!(user.money("money").unwrap().unwrap().amount(), &BigInt::from(10000));

        caster.set(&mut user, "money", 100).unwrap();
        assert_eq!(user.money("money").unwrap().unwrap().amount(), &BigInt::from(10000));

        caster.set(&mut user, "wage", 70500.19).unwrap();
        assert_eq!(user.money("wage").unwrap().unwrap().amount(), &BigInt::from(7050019));

        caster.set(&mut user, "debits", "¥213860").unwrap();
        let debits = user.money("debits").unwrap().unwrap();
        assert_eq!(debits.amount(), &BigInt::from(213860));
        assert_eq!(debits.currency_code().as_str(), "JPY");
        assert_eq!(user.attribute("currency").unwrap(), &text("JPY"));

        caster.set(&mut user, "credits", 123.0).unwrap();
        assert_eq!(user.money("credits").unwrap().unwrap().amount(), &BigInt::from(12300));

        caster.set(&mut user, "money", "100,000.22").unwrap();
        assert_eq!(
            user.money("money").unwrap().unwrap().amount(),
            &BigInt::from(10000022)
        );

        caster.set(&mut user, "debits", "Ƀ0.00012345").unwrap();
        let debits = user.money("debits").unwrap().unwrap();
        assert_eq!(debits.amount(), &BigInt::from(12345));
        assert_eq!(debits.currency_code().as_str(), "XBT");
        assert_eq!(user.attribute("currency").unwrap(), &text("XBT"));

        caster.set(&mut user, "credits", 234).unwrap();
        assert_eq!(user.money("credits").unwrap().unwrap().amount(), &BigInt::from(23400));

        let id = service.save(&mut user).await.unwrap();
        assert_eq!(user.id(), Some(id));

        let row = service.store().row("users", id).unwrap();
        assert_eq!(row["money"], text("$100,000.22"));
        assert_eq!(row["wage"], StoredValue::Integer(7050019));
        assert_eq!(row["debits"], text("0.00012345"));
        assert_eq!(row["credits"], text("234.00"));
        assert_eq!(row["currency"], text("XBT"));
    }

    #[tokio::test]
    async fn test_saved_record_reads_back_equal() {
        let service = service();
        let schema = user_schema();
        let caster = service.caster();
        let mut user = service.make(&schema);

        caster.set(&mut user, "money", "$98,765.43").unwrap();
        caster.set(&mut user, "wage", "€1,000.5").unwrap();
        caster.set(&mut user, "debits", "CA$12").unwrap();
        let id = service.save(&mut user).await.unwrap();

        let loaded = service.find(&schema, id).await.unwrap();
        for field in ["money", "wage", "debits", "credits"] {
            assert_eq!(loaded.money(field).unwrap(), user.money(field).unwrap());
        }
        assert_eq!(loaded.attribute("currency").unwrap(), &text("CAD"));
    }

    #[tokio::test]
    async fn test_update_overwrites_existing_row() {
        let service = service();
        let schema = user_schema();
        let caster = service.caster();
        let mut user = service.make(&schema);

        caster.set(&mut user, "credits", 5).unwrap();
        let id = service.save(&mut user).await.unwrap();

        caster.set(&mut user, "credits", "7.25").unwrap();
        assert_eq!(service.save(&mut user).await.unwrap(), id);

        let loaded = service.find(&schema, id).await.unwrap();
        assert_eq!(
            loaded.money("credits").unwrap().unwrap().amount(),
            &BigInt::from(725)
        );
    }

    #[tokio::test]
    async fn test_rejects_unsupported_value() {
        let service = service();
        let schema = user_schema();
        let mut user = service.make(&schema);

        let err = service
            .caster()
            .set(&mut user, "money", MoneyInput::Other("array".into()))
            .unwrap_err();

        assert!(matches!(
            err,
            CastError::Domain(DomainError::InvalidInput { .. })
        ));
        assert_eq!(err.to_string(), "Invalid data provided for User::$money");
    }

    #[tokio::test]
    async fn test_rejects_unparseable_text() {
        let service = service();
        let schema = user_schema();
        let mut user = service.make(&schema);

        let err = service.caster().set(&mut user, "money", "abc").unwrap_err();

        assert!(matches!(err, CastError::Domain(DomainError::Parse { .. })));
        assert_eq!(err.to_string(), "Unable to parse abc");
        assert_eq!(user.money("money").unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_unknown_field() {
        let service = service();
        let schema = user_schema();
        let mut user = service.make(&schema);

        assert!(matches!(
            service.caster().set(&mut user, "salary", 1),
            Err(CastError::UnknownAttribute(_))
        ));
        assert!(matches!(
            service.caster().set(&mut user, "currency", 1),
            Err(CastError::NotMoney(_))
        ));
    }
}
