use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use iradio_merge::StreamRecord;

#[derive(sqlx::FromRow)]
pub(crate) struct StreamRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) link: String,
}
impl TryFrom<&StreamRecord> for StreamRow {
    type Error = Error;
    fn try_from(record: &StreamRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: i64::try_from(record.id).or_raise(|| ErrorKind::InvalidData("stream id"))?,
            name: record.name.clone(),
            link: record.link.clone(),
        })
    }
}
impl TryFrom<StreamRow> for StreamRecord {
    type Error = Error;
    fn try_from(row: StreamRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id).or_raise(|| ErrorKind::InvalidData("stream id"))?;
        if id == 0 {
            exn::bail!(ErrorKind::InvalidData("stream id"));
        }
        Ok(StreamRecord::new(id, row.name, row.link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_model() {
        let row = StreamRow {
            id: 3,
            name: "Indie Wave".to_string(),
            link: "http://stream.example.com:8000/live".to_string(),
        };
        let record = StreamRecord::try_from(row).unwrap();
        assert_eq!(record, StreamRecord::new(3, "Indie Wave", "http://stream.example.com:8000/live"));
    }

    #[test]
    fn test_row_with_bad_identifier() {
        for id in [0, -1] {
            let row = StreamRow { id, name: String::new(), link: String::new() };
            let err = StreamRecord::try_from(row).unwrap_err();
            assert!(matches!(&*err, ErrorKind::InvalidData("stream id")));
        }
    }

    #[test]
    fn test_model_to_row() {
        let record = StreamRecord::new(u64::MAX, "Too Big", "http://a");
        assert!(StreamRow::try_from(&record).is_err());
        let row = StreamRow::try_from(&StreamRecord::new(12, "Jazz24", "http://b")).unwrap();
        assert_eq!((row.id, row.name.as_str(), row.link.as_str()), (12, "Jazz24", "http://b"));
    }
}
