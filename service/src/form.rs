//! Typed form payloads, one per entity and operation.
//!
//! Each form names the columns it writes in `FIELDS`. Inserts and updates copy
//! exactly those columns from the cleaned model, so a column that is not
//! listed can never be written through a form.

use std::collections::BTreeSet;

use ::entity::{cook, dish, dish_type, ingredient, prelude::*};
use sea_orm::{prelude::Decimal, *};
use serde::{Deserialize, Serialize};

use crate::{
    auth,
    error::{FieldErrors, ServiceError},
    validation::{self, NAME_MAX_LENGTH},
};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Copies `fields` of `model` onto `active`, marking them as set.
pub(crate) fn apply_fields<A>(
    active: &mut A,
    model: &<A::Entity as EntityTrait>::Model,
    fields: &[<A::Entity as EntityTrait>::Column],
) where
    A: ActiveModelTrait,
{
    for column in fields {
        active.set(*column, model.get(*column));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DishTypeForm {
    pub name: String,
}

impl DishTypeForm {
    pub const FIELDS: &'static [dish_type::Column] = &[dish_type::Column::Name];

    pub fn clean(&self) -> Result<dish_type::Model, ServiceError> {
        let mut errors = FieldErrors::new();
        let name = validation::required_text(&mut errors, "name", &self.name, Some(NAME_MAX_LENGTH));
        errors.into_result()?;

        Ok(dish_type::Model { id: 0, name })
    }
}

impl From<&dish_type::Model> for DishTypeForm {
    fn from(model: &dish_type::Model) -> Self {
        Self {
            name: model.name.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IngredientForm {
    pub name: String,
    pub country: String,
}

impl IngredientForm {
    pub const FIELDS: &'static [ingredient::Column] =
        &[ingredient::Column::Name, ingredient::Column::Country];

    pub fn clean(&self) -> Result<ingredient::Model, ServiceError> {
        let mut errors = FieldErrors::new();
        let name = validation::required_text(&mut errors, "name", &self.name, Some(NAME_MAX_LENGTH));
        let country =
            validation::required_text(&mut errors, "country", &self.country, Some(NAME_MAX_LENGTH));
        errors.into_result()?;

        Ok(ingredient::Model {
            id: 0,
            name,
            country,
        })
    }
}

impl From<&ingredient::Model> for IngredientForm {
    fn from(model: &ingredient::Model) -> Self {
        Self {
            name: model.name.clone(),
            country: model.country.clone(),
        }
    }
}

/// Dish fields plus the full ingredient and cook sets; updates replace both sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DishForm {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: i32,
    pub ingredient_ids: Vec<i32>,
    pub cook_ids: Vec<i32>,
}

impl DishForm {
    pub const FIELDS: &'static [dish::Column] = &[
        dish::Column::Name,
        dish::Column::Description,
        dish::Column::Price,
        dish::Column::DishTypeId,
    ];

    /// Validates the form and checks that every referenced row exists.
    pub async fn clean<C>(&self, db: &C) -> Result<dish::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut errors = FieldErrors::new();
        let name = validation::required_text(&mut errors, "name", &self.name, Some(NAME_MAX_LENGTH));
        let description = validation::required_text(&mut errors, "description", &self.description, None);
        let price = validation::price(&mut errors, self.price);

        if DishType::find_by_id(self.dish_type_id).one(db).await?.is_none() {
            errors.add("dish_type", INVALID_CHOICE);
        }
        let ingredient_ids = self.ingredient_ids();
        if !ingredient_ids.is_empty() {
            let found = Ingredient::find()
                .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
                .count(db)
                .await?;
            if found != ingredient_ids.len() as u64 {
                errors.add("ingredients", INVALID_CHOICE);
            }
        }
        let cook_ids = self.cook_ids();
        if !cook_ids.is_empty() {
            let found = Cook::find()
                .filter(cook::Column::Id.is_in(cook_ids.iter().copied()))
                .count(db)
                .await?;
            if found != cook_ids.len() as u64 {
                errors.add("cooks", INVALID_CHOICE);
            }
        }
        errors.into_result()?;

        Ok(dish::Model {
            id: 0,
            name,
            description,
            price,
            dish_type_id: self.dish_type_id,
        })
    }

    pub(crate) fn ingredient_ids(&self) -> BTreeSet<i32> {
        self.ingredient_ids.iter().copied().collect()
    }

    pub(crate) fn cook_ids(&self) -> BTreeSet<i32> {
        self.cook_ids.iter().copied().collect()
    }

    pub fn from_model(
        model: &dish::Model,
        ingredients: &[ingredient::Model],
        cooks: &[cook::Model],
    ) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            price: model.price,
            dish_type_id: model.dish_type_id,
            ingredient_ids: ingredients.iter().map(|i| i.id).collect(),
            cook_ids: cooks.iter().map(|c| c.id).collect(),
        }
    }
}

/// Registration form: account fields plus the password typed twice.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CookCreateForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
}

impl std::fmt::Debug for CookCreateForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookCreateForm")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("years_of_experience", &self.years_of_experience)
            .finish_non_exhaustive()
    }
}

impl CookCreateForm {
    pub const FIELDS: &'static [cook::Column] = &[
        cook::Column::Username,
        cook::Column::FirstName,
        cook::Column::LastName,
        cook::Column::Password,
        cook::Column::YearsOfExperience,
    ];

    /// Validates the form and hashes the password.
    pub fn clean(&self) -> Result<cook::Model, ServiceError> {
        let mut errors = FieldErrors::new();
        let username = validation::username(&mut errors, &self.username);
        let first_name = validation::required_text(
            &mut errors,
            "first_name",
            &self.first_name,
            Some(validation::USERNAME_MAX_LENGTH),
        );
        let last_name = validation::required_text(
            &mut errors,
            "last_name",
            &self.last_name,
            Some(validation::USERNAME_MAX_LENGTH),
        );
        validation::years_of_experience(&mut errors, self.years_of_experience);
        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        errors.into_result()?;

        Ok(cook::Model {
            id: 0,
            username,
            first_name,
            last_name,
            password: auth::hash_password(&self.password1)?,
            years_of_experience: self.years_of_experience,
        })
    }
}

/// Profile edit form; the password is left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CookUpdateForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
}

impl CookUpdateForm {
    pub const FIELDS: &'static [cook::Column] = &[
        cook::Column::Username,
        cook::Column::FirstName,
        cook::Column::LastName,
        cook::Column::YearsOfExperience,
    ];

    pub fn clean(&self) -> Result<cook::Model, ServiceError> {
        let mut errors = FieldErrors::new();
        let username = validation::username(&mut errors, &self.username);
        let first_name = validation::required_text(
            &mut errors,
            "first_name",
            &self.first_name,
            Some(validation::USERNAME_MAX_LENGTH),
        );
        let last_name = validation::required_text(
            &mut errors,
            "last_name",
            &self.last_name,
            Some(validation::USERNAME_MAX_LENGTH),
        );
        validation::years_of_experience(&mut errors, self.years_of_experience);
        errors.into_result()?;

        Ok(cook::Model {
            id: 0,
            username,
            first_name,
            last_name,
            password: String::new(),
            years_of_experience: self.years_of_experience,
        })
    }
}

impl From<&cook::Model> for CookUpdateForm {
    fn from(model: &cook::Model) -> Self {
        Self {
            username: model.username.clone(),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            years_of_experience: model.years_of_experience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<C: ColumnTrait>(columns: &[C]) -> Vec<String> {
        columns.iter().map(|c| IdenStatic::as_str(c).to_owned()).collect()
    }

    fn writable<C: ColumnTrait>(except: &[&str]) -> Vec<String> {
        C::iter()
            .map(|c| IdenStatic::as_str(&c).to_owned())
            .filter(|name| !except.contains(&name.as_str()))
            .collect()
    }

    #[test]
    fn field_lists_cover_every_writable_column() {
        assert_eq!(
            names(DishTypeForm::FIELDS),
            writable::<dish_type::Column>(&["id"])
        );
        assert_eq!(
            names(IngredientForm::FIELDS),
            writable::<ingredient::Column>(&["id"])
        );
        assert_eq!(names(DishForm::FIELDS), writable::<dish::Column>(&["id"]));
        assert_eq!(
            names(CookCreateForm::FIELDS),
            writable::<cook::Column>(&["id"])
        );
        assert_eq!(
            names(CookUpdateForm::FIELDS),
            writable::<cook::Column>(&["id", "password"])
        );
    }

    #[test]
    fn cook_create_form_reports_every_problem_at_once() {
        let form = CookCreateForm {
            username: "bad name".to_owned(),
            password1: "secret".to_owned(),
            password2: "different".to_owned(),
            first_name: String::new(),
            last_name: "Rossi".to_owned(),
            years_of_experience: 1,
        };

        match form.clean().unwrap_err() {
            ServiceError::Validation(errors) => {
                for field in ["username", "password2", "first_name", "years_of_experience"] {
                    assert!(errors.contains(field), "missing error for {field}");
                }
                assert!(!errors.contains("last_name"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn cook_create_form_hashes_the_password() {
        let form = CookCreateForm {
            username: "mario".to_owned(),
            password1: "s3cret-pass".to_owned(),
            password2: "s3cret-pass".to_owned(),
            first_name: "Mario".to_owned(),
            last_name: "Rossi".to_owned(),
            years_of_experience: 2,
        };

        let model = form.clean().unwrap();
        assert_ne!(model.password, "s3cret-pass");
        assert!(auth::verify_password("s3cret-pass", &model.password));
    }
}
