//! 邮编池与条码服务

use std::sync::Arc;

use courier_errors::{AppError, AppResult};
use courier_telemetry::{increment_counter, names};
use tracing::{debug, info};

use crate::application::dto::{BarcodeInnerNumberDto, PostcodePoolDto};
use crate::application::mappers::{barcode_from_dto, postcode_pool_from_dto};
use crate::domain::entities::{BarcodeInnerNumber, PostcodePool};
use crate::domain::repositories::PostcodePoolRepository;
use crate::domain::value_objects::{BarcodeInnerNumberId, Postcode, PostcodePoolId};

pub struct PostcodePoolService {
    pool_repo: Arc<dyn PostcodePoolRepository>,
}

impl PostcodePoolService {
    pub fn new(pool_repo: Arc<dyn PostcodePoolRepository>) -> Self {
        Self { pool_repo }
    }

    pub async fn get_all(&self) -> AppResult<Vec<PostcodePoolDto>> {
        let pools = self.pool_repo.find_all().await?;
        Ok(pools.iter().map(PostcodePoolDto::from).collect())
    }

    pub async fn get_by_id(&self, id: &PostcodePoolId) -> AppResult<Option<PostcodePoolDto>> {
        Ok(self
            .pool_repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(PostcodePoolDto::from))
    }

    async fn ensure_postcode_free(
        &self,
        postcode: &Postcode,
        owner: Option<&PostcodePoolId>,
    ) -> AppResult<()> {
        match self.pool_repo.find_by_postcode(postcode).await? {
            Some(pool) if Some(pool.id()) != owner => Err(AppError::conflict(format!(
                "Postcode pool {} already exists",
                postcode
            ))),
            _ => Ok(()),
        }
    }

    pub async fn save(&self, dto: PostcodePoolDto) -> AppResult<PostcodePoolDto> {
        let pool = postcode_pool_from_dto(PostcodePoolDto { id: None, ..dto })?;
        self.ensure_postcode_free(pool.postcode(), None).await?;
        info!("Saving postcode pool {}", pool.postcode());
        self.pool_repo.save(&pool).await?;
        Ok(PostcodePoolDto::from(&pool))
    }

    /// 更新邮编与关闭标志，池内条码保持不变
    pub async fn update(
        &self,
        id: &PostcodePoolId,
        dto: PostcodePoolDto,
    ) -> AppResult<Option<PostcodePoolDto>> {
        let Some(mut pool) = self.pool_repo.find_by_id(id).await? else {
            debug!("Can't update postcode pool. Pool doesn't exist {}", id);
            return Ok(None);
        };
        let postcode = Postcode::new(dto.postcode)?;
        self.ensure_postcode_free(&postcode, Some(id)).await?;
        pool.set_postcode(postcode);
        pool.set_closed(dto.closed);
        info!("Updating postcode pool {}", id);
        self.pool_repo.update(&pool).await?;
        Ok(Some(PostcodePoolDto::from(&pool)))
    }

    pub async fn delete(&self, id: &PostcodePoolId) -> AppResult<bool> {
        let deleted = self.pool_repo.delete(id).await?;
        if deleted {
            info!("Deleted postcode pool {}", id);
        } else {
            debug!("Can't delete postcode pool. Pool doesn't exist {}", id);
        }
        Ok(deleted)
    }

    // ========== 条码 ==========

    pub async fn get_barcodes(
        &self,
        pool_id: &PostcodePoolId,
    ) -> AppResult<Option<Vec<BarcodeInnerNumberDto>>> {
        Ok(self.pool_repo.find_by_id(pool_id).await?.map(|pool| {
            pool.barcode_inner_numbers()
                .iter()
                .map(BarcodeInnerNumberDto::from)
                .collect()
        }))
    }

    pub async fn get_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
    ) -> AppResult<Option<BarcodeInnerNumberDto>> {
        Ok(self
            .pool_repo
            .find_by_id(pool_id)
            .await?
            .and_then(|pool| pool.find_barcode(barcode_id).map(BarcodeInnerNumberDto::from)))
    }

    /// 向池中追加条码；池不存在时返回 `false`
    pub async fn add_barcode_inner_numbers(
        &self,
        pool_id: &PostcodePoolId,
        barcodes: Vec<BarcodeInnerNumberDto>,
    ) -> AppResult<bool> {
        let Some(mut pool) = self.pool_repo.find_by_id(pool_id).await? else {
            debug!("Can't add barcodes. Postcode pool doesn't exist {}", pool_id);
            return Ok(false);
        };
        let mut added = Vec::with_capacity(barcodes.len());
        for dto in barcodes {
            let barcode = barcode_from_dto(*pool_id, BarcodeInnerNumberDto { id: None, ..dto })?;
            pool.add_barcode_inner_number(barcode.clone())?;
            added.push(barcode);
        }
        info!("Adding {} barcodes to postcode pool {}", added.len(), pool.postcode());
        self.pool_repo.add_barcodes(&added).await?;
        Ok(true)
    }

    pub async fn update_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
        dto: BarcodeInnerNumberDto,
    ) -> AppResult<Option<BarcodeInnerNumberDto>> {
        let Some(mut pool) = self.pool_repo.find_by_id(pool_id).await? else {
            return Ok(None);
        };
        let barcode = barcode_from_dto(
            *pool_id,
            BarcodeInnerNumberDto {
                id: Some(*barcode_id),
                ..dto
            },
        )?;
        let updated = pool.update_barcode(barcode.clone())?
            && self.pool_repo.update_barcode(&barcode).await?;
        if !updated {
            debug!("Can't update barcode. Barcode doesn't exist {}", barcode_id);
            return Ok(None);
        }
        Ok(Some(BarcodeInnerNumberDto::from(&barcode)))
    }

    pub async fn delete_barcode(
        &self,
        pool_id: &PostcodePoolId,
        barcode_id: &BarcodeInnerNumberId,
    ) -> AppResult<bool> {
        self.pool_repo.delete_barcode(pool_id, barcode_id).await
    }

    /// 生成并持久化下一个条码
    pub async fn generate_barcode_inner_number(
        &self,
        pool_id: &PostcodePoolId,
    ) -> AppResult<Option<BarcodeInnerNumberDto>> {
        let Some(mut pool) = self.pool_repo.find_by_id(pool_id).await? else {
            debug!("Can't generate barcode. Postcode pool doesn't exist {}", pool_id);
            return Ok(None);
        };
        let barcode = self.issue(&mut pool).await?;
        Ok(Some(BarcodeInnerNumberDto::from(&barcode)))
    }

    /// 在给定池中发放条码并立即持久化
    pub async fn issue(&self, pool: &mut PostcodePool) -> AppResult<BarcodeInnerNumber> {
        let barcode = pool.issue_barcode_inner_number()?;
        self.pool_repo.add_barcode(&barcode).await?;
        increment_counter(names::BARCODES_ISSUED);
        info!(
            "Issued barcode {} from postcode pool {}",
            pool.full_barcode(&barcode.number),
            pool.postcode()
        );
        Ok(barcode)
    }
}
