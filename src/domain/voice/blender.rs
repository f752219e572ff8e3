//! 音色向量混合
//!
//! 按归一化权重对各音色向量做逐元素加权求和

use super::{VoiceBlendSpec, VoiceEmbedding, VoiceError, VoiceId, FULL_WEIGHT};

/// 混合音色向量
///
/// 计算 `sum(weight_i / 100 * embedding_of(voice_i))`，按描述顺序累加（f64 累加，最后收窄为 f32）
///
/// 单音色描述直接返回源向量，结果与源向量逐位相同
pub fn blend_embeddings<F>(
    spec: &VoiceBlendSpec,
    mut embedding_of: F,
) -> Result<VoiceEmbedding, VoiceError>
where
    F: FnMut(&VoiceId) -> Option<VoiceEmbedding>,
{
    if let Some(voice) = spec.single_voice() {
        return resolve(voice, &mut embedding_of);
    }

    let mut acc: Vec<f64> = Vec::new();
    let mut expected_dim: Option<usize> = None;

    for entry in spec.entries() {
        let embedding = resolve(&entry.voice, &mut embedding_of)?;

        let expected = *expected_dim.get_or_insert(embedding.dim());
        if embedding.dim() != expected {
            tracing::error!(
                voice = %entry.voice,
                expected,
                actual = embedding.dim(),
                "Embedding dimension mismatch while blending"
            );
            return Err(VoiceError::EmbeddingDimensionMismatch {
                voice: entry.voice.clone(),
                expected,
                actual: embedding.dim(),
            });
        }

        if acc.is_empty() {
            acc = vec![0.0; expected];
        }

        let portion = entry.weight / FULL_WEIGHT;
        for (sum, value) in acc.iter_mut().zip(embedding.as_slice()) {
            *sum += portion * f64::from(*value);
        }
    }

    tracing::debug!(
        spec = %spec,
        dim = acc.len(),
        "Voice embeddings blended"
    );

    Ok(VoiceEmbedding::new(acc.into_iter().map(|v| v as f32).collect()))
}

fn resolve<F>(voice: &VoiceId, embedding_of: &mut F) -> Result<VoiceEmbedding, VoiceError>
where
    F: FnMut(&VoiceId) -> Option<VoiceEmbedding>,
{
    embedding_of(voice).ok_or_else(|| {
        tracing::error!(voice = %voice, "No embedding for a validated voice");
        VoiceError::MissingEmbedding(voice.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn table() -> HashMap<VoiceId, VoiceEmbedding> {
        HashMap::from([
            ("af_sarah".into(), VoiceEmbedding::new(vec![0.1, 0.7, -0.3, 0.123_456_79])),
            ("am_adam".into(), VoiceEmbedding::new(vec![1.0, -1.0, 0.5, 0.0])),
            ("bf_emma".into(), VoiceEmbedding::new(vec![0.25, 0.25, 0.25, 0.25])),
        ])
    }

    fn available(table: &HashMap<VoiceId, VoiceEmbedding>) -> HashSet<VoiceId> {
        table.keys().cloned().collect()
    }

    #[test]
    fn test_single_voice_is_bit_identical() {
        let table = table();
        let spec = VoiceBlendSpec::parse("af_sarah", &available(&table)).unwrap();
        let blended = blend_embeddings(&spec, |v| table.get(v).cloned()).unwrap();
        assert_eq!(blended, table[&VoiceId::from("af_sarah")]);
    }

    #[test]
    fn test_weighted_sum() {
        let table = table();
        let spec = VoiceBlendSpec::parse("af_sarah:60,am_adam:40", &available(&table)).unwrap();
        let blended = blend_embeddings(&spec, |v| table.get(v).cloned()).unwrap();

        let expected = [0.46_f32, 0.02, 0.02, 0.074_074_07];
        for (got, want) in blended.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {}, want {}", got, want);
        }
    }

    #[test]
    fn test_blend_is_order_invariant() {
        let table = table();
        let voices = available(&table);
        let a = VoiceBlendSpec::parse("af_sarah:20,am_adam:30,bf_emma:50", &voices).unwrap();
        let b = VoiceBlendSpec::parse("bf_emma:50,af_sarah:20,am_adam:30", &voices).unwrap();

        let blended_a = blend_embeddings(&a, |v| table.get(v).cloned()).unwrap();
        let blended_b = blend_embeddings(&b, |v| table.get(v).cloned()).unwrap();

        for (x, y) in blended_a.as_slice().iter().zip(blended_b.as_slice()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_embedding_is_internal_error() {
        let table = table();
        let mut voices = available(&table);
        voices.insert("ghost".into());
        let spec = VoiceBlendSpec::parse("af_sarah,ghost", &voices).unwrap();

        let err = blend_embeddings(&spec, |v| table.get(v).cloned()).unwrap_err();
        assert_eq!(err, VoiceError::MissingEmbedding("ghost".into()));
        assert!(err.is_internal());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut table = table();
        table.insert("short".into(), VoiceEmbedding::new(vec![1.0, 2.0]));
        let spec = VoiceBlendSpec::parse("af_sarah,short", &available(&table)).unwrap();

        let err = blend_embeddings(&spec, |v| table.get(v).cloned()).unwrap_err();
        assert!(matches!(
            err,
            VoiceError::EmbeddingDimensionMismatch { expected: 4, actual: 2, .. }
        ));
    }
}
