//! 邮编池实体

use serde::{Deserialize, Serialize};

use crate::domain::entities::BarcodeInnerNumber;
use crate::domain::value_objects::{BarcodeInnerNumberId, InnerNumber, Postcode, PostcodePoolId};
use crate::error::{PostalError, PostalResult};

/// 邮编池
///
/// 每个邮编下发放的条码内部号在池内唯一，完整条码为 `邮编 + 内部号`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostcodePool {
    id: PostcodePoolId,
    postcode: Postcode,
    closed: bool,
    barcode_inner_numbers: Vec<BarcodeInnerNumber>,
}

impl PostcodePool {
    pub fn new(postcode: Postcode, closed: bool) -> Self {
        Self {
            id: PostcodePoolId::new(),
            postcode,
            closed,
            barcode_inner_numbers: Vec::new(),
        }
    }

    /// 从持久化数据重建
    pub fn restore(
        id: PostcodePoolId,
        postcode: Postcode,
        closed: bool,
        barcode_inner_numbers: Vec<BarcodeInnerNumber>,
    ) -> Self {
        Self {
            id,
            postcode,
            closed,
            barcode_inner_numbers,
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &PostcodePoolId {
        &self.id
    }

    pub fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn barcode_inner_numbers(&self) -> &[BarcodeInnerNumber] {
        &self.barcode_inner_numbers
    }

    pub fn find_barcode(&self, id: &BarcodeInnerNumberId) -> Option<&BarcodeInnerNumber> {
        self.barcode_inner_numbers.iter().find(|b| &b.id == id)
    }

    /// 完整条码
    pub fn full_barcode(&self, number: &InnerNumber) -> String {
        format!("{}{}", self.postcode, number)
    }

    // ========== Mutations ==========

    pub fn set_postcode(&mut self, postcode: Postcode) {
        self.postcode = postcode;
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// 下一个可用内部号：当前最大值 + 1
    pub fn next_inner_number(&self) -> PostalResult<InnerNumber> {
        if self.closed {
            return Err(PostalError::PostcodePoolClosed(self.postcode.to_string()));
        }
        let next = self
            .barcode_inner_numbers
            .iter()
            .map(|b| b.number.value())
            .max()
            .map_or(1, |max| max + 1);
        if next > InnerNumber::MAX {
            return Err(PostalError::PostcodePoolExhausted(self.postcode.to_string()));
        }
        Ok(InnerNumber::from_value(next)?)
    }

    /// 生成新内部号（状态为 Reserved）并加入池中
    pub fn issue_barcode_inner_number(&mut self) -> PostalResult<BarcodeInnerNumber> {
        let number = self.next_inner_number()?;
        let barcode = BarcodeInnerNumber::reserved(self.id, number);
        self.barcode_inner_numbers.push(barcode.clone());
        Ok(barcode)
    }

    /// 加入已有内部号，号码在池内必须唯一
    pub fn add_barcode_inner_number(&mut self, mut barcode: BarcodeInnerNumber) -> PostalResult<()> {
        if self
            .barcode_inner_numbers
            .iter()
            .any(|b| b.number == barcode.number)
        {
            return Err(PostalError::DuplicateBarcode {
                postcode: self.postcode.to_string(),
                number: barcode.number.to_string(),
            });
        }
        barcode.postcode_pool_id = self.id;
        self.barcode_inner_numbers.push(barcode);
        Ok(())
    }

    pub fn update_barcode(&mut self, barcode: BarcodeInnerNumber) -> PostalResult<bool> {
        if self
            .barcode_inner_numbers
            .iter()
            .any(|b| b.id != barcode.id && b.number == barcode.number)
        {
            return Err(PostalError::DuplicateBarcode {
                postcode: self.postcode.to_string(),
                number: barcode.number.to_string(),
            });
        }
        match self.barcode_inner_numbers.iter_mut().find(|b| b.id == barcode.id) {
            Some(existing) => {
                existing.number = barcode.number;
                existing.status = barcode.status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_barcode(&mut self, id: &BarcodeInnerNumberId) -> bool {
        let before = self.barcode_inner_numbers.len();
        self.barcode_inner_numbers.retain(|b| &b.id != id);
        before != self.barcode_inner_numbers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::BarcodeStatus;

    fn pool() -> PostcodePool {
        PostcodePool::new(Postcode::new("00001").unwrap(), false)
    }

    #[test]
    fn test_first_number_is_one() {
        let mut pool = pool();
        let barcode = pool.issue_barcode_inner_number().unwrap();
        assert_eq!(barcode.number.as_str(), "0000001");
        assert_eq!(barcode.status, BarcodeStatus::Reserved);
        assert_eq!(barcode.postcode_pool_id, *pool.id());
        assert_eq!(pool.full_barcode(&barcode.number), "000010000001");
    }

    #[test]
    fn test_next_number_follows_max() {
        let mut pool = pool();
        let id = *pool.id();
        for n in ["0000001", "0000007", "0000003"] {
            pool.add_barcode_inner_number(BarcodeInnerNumber::new(
                id,
                InnerNumber::new(n).unwrap(),
                BarcodeStatus::Used,
            ))
            .unwrap();
        }
        let issued = pool.issue_barcode_inner_number().unwrap();
        assert_eq!(issued.number.as_str(), "0000008");
        assert_eq!(pool.barcode_inner_numbers().len(), 4);
    }

    #[test]
    fn test_closed_pool_rejects_issue() {
        let mut pool = PostcodePool::new(Postcode::new("00002").unwrap(), true);
        assert_eq!(
            pool.issue_barcode_inner_number(),
            Err(PostalError::PostcodePoolClosed("00002".to_string()))
        );
    }

    #[test]
    fn test_exhausted_pool() {
        let mut pool = pool();
        let id = *pool.id();
        pool.add_barcode_inner_number(BarcodeInnerNumber::reserved(
            id,
            InnerNumber::from_value(InnerNumber::MAX).unwrap(),
        ))
        .unwrap();
        assert!(matches!(
            pool.issue_barcode_inner_number(),
            Err(PostalError::PostcodePoolExhausted(_))
        ));
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let mut pool = pool();
        let id = *pool.id();
        let number = InnerNumber::new("0000005").unwrap();
        pool.add_barcode_inner_number(BarcodeInnerNumber::reserved(id, number.clone()))
            .unwrap();
        assert!(matches!(
            pool.add_barcode_inner_number(BarcodeInnerNumber::reserved(id, number)),
            Err(PostalError::DuplicateBarcode { .. })
        ));
    }
}
