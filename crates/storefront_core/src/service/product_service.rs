//! Product use-case service.

use super::{ServiceError, ServiceResult};
use crate::model::product::{Product, ProductId, ProductInput};
use crate::model::EntityKind;
use crate::repo::product_repo::ProductRepository;
use crate::validation::validate;
use log::info;
use serde_json::Value;

/// Product service facade over repository implementations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> ServiceResult<Vec<Product>> {
        self.repo.list_products().map_err(Into::into)
    }

    pub fn get(&self, id: ProductId) -> ServiceResult<Product> {
        self.repo.get_product(id)?.ok_or(ServiceError::NotFound {
            entity: EntityKind::Product,
            id,
        })
    }

    pub fn create(&self, payload: &Value) -> ServiceResult<Product> {
        let input = validate::<ProductInput>(payload)?.value;
        let product = self.repo.create_product(&input)?;
        info!(
            "event=product_create module=service status=ok product_id={}",
            product.id
        );
        Ok(product)
    }

    /// Replaces `name` and `price`; `NotFound` is checked before validation.
    pub fn update(&self, id: ProductId, payload: &Value) -> ServiceResult<Product> {
        self.get(id)?;
        let input = validate::<ProductInput>(payload)?.value;
        let product = self.repo.update_product(id, &input)?;
        info!("event=product_update module=service status=ok product_id={id}");
        Ok(product)
    }

    /// Deletes the product; its order associations go with it.
    pub fn delete(&self, id: ProductId) -> ServiceResult<()> {
        self.get(id)?;
        self.repo.delete_product(id)?;
        info!("event=product_delete module=service status=ok product_id={id}");
        Ok(())
    }
}
