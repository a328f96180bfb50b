//! Turns submitted `application/x-www-form-urlencoded` pairs into the typed
//! service forms. Values that do not parse are reported per field and leave
//! the field at its default, so the page can be shown again with messages.

use std::str::FromStr;

use kitchen_service::{
    form::{CookCreateForm, CookUpdateForm, DishForm, DishTypeForm, IngredientForm},
    sea_orm::prelude::Decimal,
    FieldErrors,
};

const ENTER_WHOLE_NUMBER: &str = "Enter a whole number.";
const ENTER_NUMBER: &str = "Enter a number.";

/// Raw pairs as submitted; a field may repeat (checkbox lists).
#[derive(Debug, Default)]
pub struct RawForm(Vec<(String, String)>);

impl From<Vec<(String, String)>> for RawForm {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl RawForm {
    /// The first value of `name`, or an empty string.
    pub fn value(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }

    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn text(&self, name: &str) -> String {
        self.value(name).to_owned()
    }

    fn parse<T>(&self, errors: &mut FieldErrors, name: &'static str, message: &str) -> T
    where
        T: FromStr + Default,
    {
        let value = self.value(name).trim();
        if value.is_empty() {
            errors.add(name, "This field is required.");
            return T::default();
        }
        value.parse().unwrap_or_else(|_| {
            errors.add(name, message);
            T::default()
        })
    }

    fn ids(&self, errors: &mut FieldErrors, name: &'static str) -> Vec<i32> {
        let mut ids = Vec::new();
        for value in self.values(name) {
            match value.trim().parse() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    errors.add(name, format!("\u{201c}{value}\u{201d} is not a valid value."));
                }
            }
        }
        ids
    }

    pub fn dish_type(&self) -> DishTypeForm {
        DishTypeForm {
            name: self.text("name"),
        }
    }

    pub fn ingredient(&self) -> IngredientForm {
        IngredientForm {
            name: self.text("name"),
            country: self.text("country"),
        }
    }

    pub fn dish(&self) -> (DishForm, FieldErrors) {
        let mut errors = FieldErrors::new();
        let form = DishForm {
            name: self.text("name"),
            description: self.text("description"),
            price: self.parse::<Decimal>(&mut errors, "price", ENTER_NUMBER),
            dish_type_id: self.parse(&mut errors, "dish_type", ENTER_WHOLE_NUMBER),
            ingredient_ids: self.ids(&mut errors, "ingredients"),
            cook_ids: self.ids(&mut errors, "cooks"),
        };
        (form, errors)
    }

    pub fn cook_create(&self) -> (CookCreateForm, FieldErrors) {
        let mut errors = FieldErrors::new();
        let form = CookCreateForm {
            username: self.text("username"),
            password1: self.text("password1"),
            password2: self.text("password2"),
            first_name: self.text("first_name"),
            last_name: self.text("last_name"),
            years_of_experience: self.parse(&mut errors, "years_of_experience", ENTER_WHOLE_NUMBER),
        };
        (form, errors)
    }

    pub fn cook_update(&self) -> (CookUpdateForm, FieldErrors) {
        let mut errors = FieldErrors::new();
        let form = CookUpdateForm {
            username: self.text("username"),
            first_name: self.text("first_name"),
            last_name: self.text("last_name"),
            years_of_experience: self.parse(&mut errors, "years_of_experience", ENTER_WHOLE_NUMBER),
        };
        (form, errors)
    }
}
