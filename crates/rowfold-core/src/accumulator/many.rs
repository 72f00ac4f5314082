use crate::{
    accumulator::{MergeContext, OneAccumulator},
    error::AggregationConflictError,
    field::{Payload, Transform},
    key::IdentityIndex,
    obs::sink::{MetricsEvent, record},
    value::Value,
};

///
/// ManyAccumulator
///
/// Keyed list of instances at one tree position.
///
/// Members keep first-appearance order; the index resolves a key to its
/// member position by bucket string and then by structural equality.
///

pub(crate) struct ManyAccumulator {
    members: Vec<OneAccumulator>,
    index: IdentityIndex,
    transform: Option<Transform>,
}

impl ManyAccumulator {
    pub(crate) fn new(
        key: Value,
        payload: Payload,
        transform: Option<Transform>,
        cx: MergeContext<'_>,
    ) -> Self {
        let mut many = Self {
            members: Vec::new(),
            index: IdentityIndex::default(),
            transform,
        };
        many.insert(cx.stringifier.stringify(&key), key, payload, cx);

        many
    }

    #[must_use]
    pub(crate) fn members(&self) -> &[OneAccumulator] {
        &self.members
    }

    #[must_use]
    pub(crate) const fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub(crate) fn merge(
        &mut self,
        key: Value,
        payload: Payload,
        transform: Option<Transform>,
        cx: MergeContext<'_>,
    ) -> Result<(), AggregationConflictError> {
        if self.transform.is_none() {
            self.transform = transform;
        }

        let bucket = cx.stringifier.stringify(&key);
        match self.index.position(&bucket, &key) {
            Some(position) => self.members[position]
                .merge(Some(key), payload, None, cx)
                .map_err(|err| err.with_member(&bucket)),
            None => {
                self.insert(bucket, key, payload, cx);
                Ok(())
            }
        }
    }

    fn insert(&mut self, bucket: String, key: Value, payload: Payload, cx: MergeContext<'_>) {
        let position = self.members.len();
        self.members
            .push(OneAccumulator::new(Some(key.clone()), payload, None, cx));
        self.index.insert(bucket, key, position);
        record(MetricsEvent::MemberInserted);
    }
}
