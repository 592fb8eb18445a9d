//! In-memory store implementing both repositories
//!
//! Mirrors the PostgreSQL schema's constraints so services behave the
//! same against either backend:
//! - live area names and live person emails are unique
//! - `area_id` must reference an existing area row (deleted or not)
//! - ids come from per-table sequences starting at 1

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::migrations::{AREA_NAME_UNIQUE, PERSON_AREA_FK, PERSON_EMAIL_UNIQUE};
use super::repos::{Area, AreaRepository, AreaWithCount, DbError, Person, PersonRepository};
use crate::models::{AreaId, NewArea, NewPerson, PersonId};

#[derive(Default)]
struct Tables {
    areas: BTreeMap<AreaId, Area>,
    /// Stored without the joined area; attached on read
    people: BTreeMap<PersonId, Person>,
    area_seq: AreaId,
    person_seq: PersonId,
}

impl Tables {
    fn live_area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id).filter(|a| a.deleted_at.is_none())
    }

    fn with_area(&self, person: &Person) -> Person {
        Person {
            area: self.live_area(person.area_id).cloned(),
            ..person.clone()
        }
    }

    fn check_area_name(&self, nombre: &str, except: Option<AreaId>) -> Result<(), DbError> {
        let taken = self.areas.values().any(|a| {
            a.deleted_at.is_none() && a.nombre == nombre && Some(a.id) != except
        });
        if taken {
            return Err(DbError::UniqueViolation {
                constraint: AREA_NAME_UNIQUE.to_owned(),
            });
        }
        Ok(())
    }

    fn check_person(&self, person: &NewPerson, except: Option<PersonId>) -> Result<(), DbError> {
        let taken = self.people.values().any(|p| {
            p.deleted_at.is_none() && p.email == person.email.as_str() && Some(p.id) != except
        });
        if taken {
            return Err(DbError::UniqueViolation {
                constraint: PERSON_EMAIL_UNIQUE.to_owned(),
            });
        }
        if !self.areas.contains_key(&person.area_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: PERSON_AREA_FK.to_owned(),
            });
        }
        Ok(())
    }
}

/// Shared in-memory backend; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AreaRepository for MemoryStore {
    async fn create(&self, area: &NewArea) -> Result<Area, DbError> {
        let mut tables = self.tables.write().await;
        tables.check_area_name(area.nombre.as_str(), None)?;

        tables.area_seq += 1;
        let now = Utc::now();
        let created = Area {
            id: tables.area_seq,
            nombre: area.nombre.as_str().to_owned(),
            descripcion: area.descripcion.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.areas.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Area>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .areas
            .values()
            .filter(|a| include_deleted || a.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn get(&self, id: AreaId, include_deleted: bool) -> Result<Area, DbError> {
        let tables = self.tables.read().await;
        tables
            .areas
            .get(&id)
            .filter(|a| include_deleted || a.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| DbError::not_found("area", id))
    }

    async fn update(&self, id: AreaId, area: &NewArea) -> Result<Area, DbError> {
        let mut tables = self.tables.write().await;
        if tables.live_area(id).is_none() {
            return Err(DbError::not_found("area", id));
        }
        tables.check_area_name(area.nombre.as_str(), Some(id))?;

        let stored = tables
            .areas
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("area", id))?;
        stored.nombre = area.nombre.as_str().to_owned();
        stored.descripcion = area.descripcion.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: AreaId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        let members = tables
            .people
            .values()
            .filter(|p| p.area_id == id && p.deleted_at.is_none())
            .count() as i64;
        if members > 0 && tables.live_area(id).is_some() {
            return Err(DbError::InUse { members });
        }

        match tables.areas.get_mut(&id) {
            Some(area) if area.deleted_at.is_none() => {
                area.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DbError::not_found("area", id)),
        }
    }

    async fn list_with_count(&self) -> Result<Vec<AreaWithCount>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .areas
            .values()
            .filter(|a| a.deleted_at.is_none())
            .map(|a| AreaWithCount {
                id: a.id,
                nombre: a.nombre.clone(),
                descripcion: a.descripcion.clone(),
                personas: tables
                    .people
                    .values()
                    .filter(|p| p.area_id == a.id && p.deleted_at.is_none())
                    .count() as i64,
            })
            .collect())
    }

    async fn count_members(&self, id: AreaId) -> Result<i64, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .people
            .values()
            .filter(|p| p.area_id == id && p.deleted_at.is_none())
            .count() as i64)
    }
}

#[async_trait]
impl PersonRepository for MemoryStore {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError> {
        let mut tables = self.tables.write().await;
        tables.check_person(person, None)?;

        tables.person_seq += 1;
        let now = Utc::now();
        let created = Person {
            id: tables.person_seq,
            nombre: person.nombre.as_str().to_owned(),
            email: person.email.as_str().to_owned(),
            area_id: person.area_id,
            area: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.people.insert(created.id, created.clone());
        Ok(tables.with_area(&created))
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Person>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .people
            .values()
            .filter(|p| include_deleted || p.deleted_at.is_none())
            .map(|p| tables.with_area(p))
            .collect())
    }

    async fn get(&self, id: PersonId, include_deleted: bool) -> Result<Person, DbError> {
        let tables = self.tables.read().await;
        tables
            .people
            .get(&id)
            .filter(|p| include_deleted || p.deleted_at.is_none())
            .map(|p| tables.with_area(p))
            .ok_or_else(|| DbError::not_found("persona", id))
    }

    async fn get_by_email(&self, email: &str) -> Result<Person, DbError> {
        let tables = self.tables.read().await;
        tables
            .people
            .values()
            .find(|p| p.deleted_at.is_none() && p.email == email)
            .map(|p| tables.with_area(p))
            .ok_or_else(|| DbError::not_found("persona", email))
    }

    async fn update(&self, id: PersonId, person: &NewPerson) -> Result<Person, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.people.get(&id).is_some_and(|p| p.deleted_at.is_none()) {
            return Err(DbError::not_found("persona", id));
        }
        tables.check_person(person, Some(id))?;

        let stored = tables
            .people
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("persona", id))?;
        stored.nombre = person.nombre.as_str().to_owned();
        stored.email = person.email.as_str().to_owned();
        stored.area_id = person.area_id;
        stored.updated_at = Utc::now();

        let updated = stored.clone();
        Ok(tables.with_area(&updated))
    }

    async fn delete(&self, id: PersonId) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        match tables.people.get_mut(&id) {
            Some(person) if person.deleted_at.is_none() => {
                person.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DbError::not_found("persona", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(nombre: &str) -> NewArea {
        NewArea::new(nombre, Some("desc")).unwrap()
    }

    fn person(email: &str, area_id: AreaId) -> NewPerson {
        NewPerson::new("Ana", email, area_id as u32).unwrap()
    }

    #[tokio::test]
    async fn ids_start_at_one_per_table() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();
        let ana = PersonRepository::create(&store, &person("ana@x.io", ventas.id))
            .await
            .unwrap();

        assert_eq!(ventas.id, 1);
        assert_eq!(ana.id, 1);
        assert_eq!(ana.area.map(|a| a.nombre), Some("Ventas".to_string()));
    }

    #[tokio::test]
    async fn live_names_are_unique_but_reusable_after_delete() {
        let store = MemoryStore::new();
        let first = AreaRepository::create(&store, &area("Ventas")).await.unwrap();

        let err = AreaRepository::create(&store, &area("Ventas")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref constraint } if constraint == AREA_NAME_UNIQUE));

        AreaRepository::delete(&store, first.id).await.unwrap();
        assert!(AreaRepository::create(&store, &area("Ventas")).await.is_ok());
    }

    #[tokio::test]
    async fn update_may_keep_own_name() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();

        let updated = AreaRepository::update(&store, ventas.id, &NewArea::new("Ventas", Some("nueva")).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.descripcion, "nueva");
    }

    #[tokio::test]
    async fn person_requires_existing_area() {
        let store = MemoryStore::new();
        let err = PersonRepository::create(&store, &person("ana@x.io", 7)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn counts_only_live_people() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();
        let marketing = AreaRepository::create(&store, &area("Marketing")).await.unwrap();

        let ana = PersonRepository::create(&store, &person("ana@x.io", ventas.id)).await.unwrap();
        PersonRepository::create(&store, &person("luis@x.io", ventas.id)).await.unwrap();
        PersonRepository::delete(&store, ana.id).await.unwrap();

        let counts = store.list_with_count().await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!((counts[0].id, counts[0].personas), (ventas.id, 1));
        assert_eq!((counts[1].id, counts[1].personas), (marketing.id, 0));
        assert_eq!(store.count_members(ventas.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleted_people_are_hidden_unless_requested() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();
        let ana = PersonRepository::create(&store, &person("ana@x.io", ventas.id)).await.unwrap();

        PersonRepository::delete(&store, ana.id).await.unwrap();

        assert!(matches!(
            PersonRepository::get(&store, ana.id, false).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            store.get_by_email("ana@x.io").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(PersonRepository::list(&store, false).await.unwrap().is_empty());
        assert_eq!(PersonRepository::list(&store, true).await.unwrap().len(), 1);
        assert!(matches!(
            PersonRepository::delete(&store, ana.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn deleted_area_is_detached_from_people() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();
        let ana = PersonRepository::create(&store, &person("ana@x.io", ventas.id)).await.unwrap();

        PersonRepository::delete(&store, ana.id).await.unwrap();
        AreaRepository::delete(&store, ventas.id).await.unwrap();

        let fetched = PersonRepository::get(&store, ana.id, true).await.unwrap();
        assert_eq!(fetched.area_id, ventas.id);
        assert!(fetched.area.is_none());
    }

    #[tokio::test]
    async fn referenced_area_is_not_deleted() {
        let store = MemoryStore::new();
        let ventas = AreaRepository::create(&store, &area("Ventas")).await.unwrap();
        PersonRepository::create(&store, &person("ana@x.io", ventas.id)).await.unwrap();
        PersonRepository::create(&store, &person("beto@x.io", ventas.id)).await.unwrap();

        assert!(matches!(
            AreaRepository::delete(&store, ventas.id).await,
            Err(DbError::InUse { members: 2 })
        ));
        assert!(AreaRepository::get(&store, ventas.id, false).await.is_ok());
    }
}
