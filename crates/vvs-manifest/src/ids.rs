//! Data source id allocation. An id is the length of `dataSources` at the
//! moment of insertion, so ids are dense, strictly increasing, and never
//! reused.

use crate::model::DataSource;

pub type DataSourceId = u32;

pub fn next_data_source_id(sources: &[DataSource]) -> DataSourceId {
    sources.len() as DataSourceId
}

pub(crate) fn push_uri(
    sources: &mut Vec<DataSource>,
    uri: &str,
    name: Option<String>,
) -> DataSourceId {
    let id = next_data_source_id(sources);
    sources.push(DataSource::Uri {
        id,
        uri: uri.to_string(),
        name,
    });
    id
}

pub(crate) fn push_collection(
    sources: &mut Vec<DataSource>,
    members: Vec<DataSourceId>,
) -> DataSourceId {
    let id = next_data_source_id(sources);
    sources.push(DataSource::Collection {
        id,
        sources: members,
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut sources: Vec<DataSource> = Vec::new();
        assert_eq!(next_data_source_id(&sources), 0);
        let a = push_uri(&mut sources, "a", None);
        let b = push_uri(&mut sources, "b", Some("b.dcm".into()));
        let c = push_collection(&mut sources, vec![a, b]);
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(next_data_source_id(&sources), 3);
        for (position, source) in sources.iter().enumerate() {
            assert_eq!(source.id() as usize, position);
        }
    }
}
