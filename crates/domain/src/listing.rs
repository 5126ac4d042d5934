//! Paged, filtered and sorted device-type listing.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::criteria::FilterCriteria;
use crate::device_type::DeviceType;
use crate::error::MalformedInputError;
use crate::selectable::{Selection, device_type_satisfies_all};
use crate::taxonomy::TaxonomyIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Id,
}

/// A `name|id` sort key with an optional `.asc|.desc` suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceTypeSort {
    pub field: SortField,
    pub descending: bool,
}

impl FromStr for DeviceTypeSort {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.split_once('.').unwrap_or((s, "asc"));
        let field = match field {
            "" | "name" => SortField::Name,
            "id" => SortField::Id,
            _ => return Err(MalformedInputError::SortKey(s.to_string())),
        };
        let descending = match direction {
            "asc" => false,
            "desc" => true,
            _ => return Err(MalformedInputError::SortKey(s.to_string())),
        };
        Ok(Self { field, descending })
    }
}

impl DeviceTypeSort {
    fn compare(self, a: &DeviceType, b: &DeviceType) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)),
            SortField::Id => a.id.cmp(&b.id),
        };
        if self.descending { ordering.reverse() } else { ordering }
    }
}

/// Parameters of [`list_device_types`].
#[derive(Debug, Clone)]
pub struct DeviceTypeListQuery {
    /// `0` means no limit.
    pub limit: usize,
    pub offset: usize,
    pub sort: DeviceTypeSort,
    /// Every criterion must be satisfied by some service.
    pub criteria: Vec<FilterCriteria>,
    pub include_modified: bool,
    pub include_unmodified: bool,
}

impl Default for DeviceTypeListQuery {
    fn default() -> Self {
        Self {
            limit: 0,
            offset: 0,
            sort: DeviceTypeSort::default(),
            criteria: Vec::new(),
            include_modified: false,
            include_unmodified: true,
        }
    }
}

/// Filter, sort, then page the device types of the index.
///
/// Device types that cannot be evaluated against the criteria are reported
/// in [`Selection::skipped`].
#[must_use]
pub fn list_device_types(
    index: &TaxonomyIndex,
    query: &DeviceTypeListQuery,
) -> Selection<DeviceType> {
    let mut selection = Selection::default();
    let mut matching = Vec::new();
    for device_type in index.device_types() {
        let wanted = if device_type.is_modified() {
            query.include_modified
        } else {
            query.include_unmodified
        };
        if !wanted {
            continue;
        }
        match device_type_satisfies_all(index, device_type, &query.criteria) {
            Ok(true) => matching.push(device_type),
            Ok(false) => {}
            Err(error) => selection.skip(device_type, error),
        }
    }
    matching.sort_by(|a, b| query.sort.compare(a, b));
    let limit = if query.limit == 0 { usize::MAX } else { query.limit };
    selection.matched = matching
        .into_iter()
        .skip(query.offset)
        .take(limit)
        .cloned()
        .collect();
    selection
}
