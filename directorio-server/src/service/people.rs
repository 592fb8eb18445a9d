//! Person use-cases
//!
//! Email uniqueness is checked here first so the common case gets a clear
//! error, then enforced again by the store's unique index; a violation
//! from the gateway maps to the same `DuplicateEmail`.

use std::sync::Arc;

use crate::db::{AreaRepository, DbError, Person, PersonRepository};
use crate::models::{NewPerson, PersonId};

use super::{ServiceError, ServiceResult};

/// Person service; also reads areas to validate references
#[derive(Clone)]
pub struct PersonService {
    people: Arc<dyn PersonRepository>,
    areas: Arc<dyn AreaRepository>,
}

impl PersonService {
    pub fn new(people: Arc<dyn PersonRepository>, areas: Arc<dyn AreaRepository>) -> Self {
        Self { people, areas }
    }

    /// Register a person whose email is not held by any live person.
    pub async fn create(&self, person: &NewPerson) -> ServiceResult<Person> {
        if self.email_owner(person).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }
        self.ensure_area(person).await?;

        self.people
            .create(person)
            .await
            .map_err(|e| write_error(e, person))
    }

    pub async fn list(&self, include_deleted: bool) -> ServiceResult<Vec<Person>> {
        Ok(self.people.list(include_deleted).await?)
    }

    pub async fn get(&self, id: PersonId) -> ServiceResult<Person> {
        self.people.get(id, false).await.map_err(lookup_error)
    }

    pub async fn get_by_email(&self, email: &str) -> ServiceResult<Person> {
        self.people.get_by_email(email).await.map_err(lookup_error)
    }

    /// Replace every field of a live person.
    ///
    /// The email check only runs when the email changes, and an email
    /// already held by this same person is allowed.
    pub async fn update(&self, id: PersonId, person: &NewPerson) -> ServiceResult<Person> {
        let existing = self.people.get(id, false).await.map_err(lookup_error)?;

        if existing.email != person.email.as_str() {
            if let Some(owner) = self.email_owner(person).await? {
                if owner != id {
                    return Err(ServiceError::DuplicateEmail);
                }
            }
        }
        self.ensure_area(person).await?;

        self.people
            .update(id, person)
            .await
            .map_err(|e| write_error(e, person))
    }

    pub async fn delete(&self, id: PersonId) -> ServiceResult<()> {
        self.people.get(id, false).await.map_err(lookup_error)?;
        self.people.delete(id).await.map_err(lookup_error)
    }

    /// Id of the live person holding the requested email, if any.
    async fn email_owner(&self, person: &NewPerson) -> ServiceResult<Option<PersonId>> {
        match self.people.get_by_email(person.email.as_str()).await {
            Ok(owner) => Ok(Some(owner.id)),
            Err(DbError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_area(&self, person: &NewPerson) -> ServiceResult<()> {
        match self.areas.get(person.area_id, false).await {
            Ok(_) => Ok(()),
            Err(DbError::NotFound { .. }) => Err(ServiceError::UnknownArea(person.area_id)),
            Err(e) => Err(e.into()),
        }
    }
}

fn lookup_error(e: DbError) -> ServiceError {
    match e {
        DbError::NotFound { .. } => ServiceError::PersonNotFound,
        other => other.into(),
    }
}

fn write_error(e: DbError, person: &NewPerson) -> ServiceError {
    match e {
        DbError::UniqueViolation { .. } => ServiceError::DuplicateEmail,
        DbError::ForeignKeyViolation { .. } => ServiceError::UnknownArea(person.area_id),
        other => lookup_error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{AreaId, NewArea};
    use crate::service::testing::BrokenStore;

    async fn setup() -> (PersonService, AreaId, AreaId) {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &NewArea::new("Ventas", None).unwrap())
            .await
            .unwrap();
        let marketing = AreaRepository::create(&store, &NewArea::new("Marketing", None).unwrap())
            .await
            .unwrap();
        let service = PersonService::new(Arc::new(store.clone()), Arc::new(store));
        (service, ventas.id, marketing.id)
    }

    fn input(nombre: &str, email: &str, area_id: AreaId) -> NewPerson {
        NewPerson::new(nombre, email, area_id as u32).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_attaches_area() {
        let (service, ventas, _) = setup().await;

        let juan = service
            .create(&input("Juan Pérez", "juan@empresa.com", ventas))
            .await
            .unwrap();

        assert!(juan.id > 0);
        assert_eq!(juan.area.map(|a| a.nombre).as_deref(), Some("Ventas"));
        assert_eq!(service.get(juan.id).await.unwrap().email, "juan@empresa.com");
    }

    #[tokio::test]
    async fn duplicate_email_rejected_regardless_of_other_fields() {
        let (service, ventas, marketing) = setup().await;
        service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .unwrap();

        let err = service
            .create(&input("Otra Persona", "juan@empresa.com", marketing))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::DuplicateEmail));
        assert_eq!(err.to_string(), "el correo electrónico ya está registrado");
    }

    #[tokio::test]
    async fn create_with_unknown_area_fails() {
        let (service, _, _) = setup().await;
        let err = service
            .create(&input("Juan", "juan@empresa.com", 99))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownArea(99)));
    }

    #[tokio::test]
    async fn update_keeping_own_email_succeeds() {
        let (service, ventas, marketing) = setup().await;
        let juan = service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .unwrap();

        let updated = service
            .update(juan.id, &input("Juan Carlos", "juan@empresa.com", marketing))
            .await
            .unwrap();

        assert_eq!(updated.id, juan.id);
        assert_eq!(updated.nombre, "Juan Carlos");
        assert_eq!(updated.area_id, marketing);
    }

    #[tokio::test]
    async fn update_to_someone_elses_email_fails() {
        let (service, ventas, _) = setup().await;
        service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .unwrap();
        let maria = service
            .create(&input("María", "maria@empresa.com", ventas))
            .await
            .unwrap();

        let err = service
            .update(maria.id, &input("María", "juan@empresa.com", ventas))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail));
    }

    #[tokio::test]
    async fn update_to_fresh_email_succeeds() {
        let (service, ventas, _) = setup().await;
        let juan = service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .unwrap();

        let updated = service
            .update(juan.id, &input("Juan", "jp@empresa.com", ventas))
            .await
            .unwrap();
        assert_eq!(updated.email, "jp@empresa.com");
        assert!(service.get_by_email("juan@empresa.com").await.is_err());
    }

    #[tokio::test]
    async fn update_missing_person_is_not_found() {
        let (service, ventas, _) = setup().await;
        let err = service
            .update(7, &input("Nadie", "nadie@empresa.com", ventas))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PersonNotFound));
    }

    #[tokio::test]
    async fn deleted_person_frees_email_and_disappears() {
        let (service, ventas, _) = setup().await;
        let juan = service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .unwrap();

        service.delete(juan.id).await.unwrap();

        assert!(matches!(
            service.get(juan.id).await.unwrap_err(),
            ServiceError::PersonNotFound
        ));
        assert!(matches!(
            service.get_by_email("juan@empresa.com").await.unwrap_err(),
            ServiceError::PersonNotFound
        ));
        assert!(matches!(
            service.delete(juan.id).await.unwrap_err(),
            ServiceError::PersonNotFound
        ));
        assert!(service
            .create(&input("Juan", "juan@empresa.com", ventas))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_email_yield_one_record() {
        let (service, ventas, _) = setup().await;

        let attempts = (0..8).map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(&input(&format!("Juan {i}"), "juan@empresa.com", ventas))
                    .await
            })
        });

        let mut created = 0;
        for handle in attempts.collect::<Vec<_>>() {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, ServiceError::DuplicateEmail)),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(service.list(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn storage_errors_pass_through() {
        let service = PersonService::new(Arc::new(BrokenStore), Arc::new(BrokenStore));
        let err = service
            .create(&input("Juan", "juan@empresa.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Db(DbError::Sqlx(_))));
    }
}
