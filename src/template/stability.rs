use crate::pose::{Frame, LandmarkIndex};

/// 安定度判定に必要な最小フレーム数
pub const MIN_FRAMES: usize = 10;

/// ランドマークが寄与するのに必要な観測数（これ以下は除外）
const MIN_OBSERVATIONS: usize = 5;

/// フレーム列の姿勢安定度 (0.0〜1.0)
///
/// ランドマークごとに (x,y,z) の軸別標準偏差を平均してばらつきとし、
/// `max(0, 1 - ばらつき)` を安定度とする。全ランドマークの平均が
/// 全体の安定度。フレーム数が 10 未満なら判定不能として 0.0 を返す
/// （エラーではなくポリシー上のデフォルト）。
pub fn stability_score(frames: &[Frame]) -> f32 {
    if frames.len() < MIN_FRAMES {
        return 0.0;
    }

    let mut stabilities = Vec::with_capacity(LandmarkIndex::COUNT);
    for landmark_idx in 0..LandmarkIndex::COUNT {
        let positions: Vec<[f32; 3]> = frames
            .iter()
            .filter_map(|frame| frame.landmarks.get(landmark_idx))
            .map(|lm| [lm.x, lm.y, lm.z])
            .collect();

        if positions.len() > MIN_OBSERVATIONS {
            let dispersion = (axis_std(&positions, 0) + axis_std(&positions, 1) + axis_std(&positions, 2)) / 3.0;
            stabilities.push((1.0 - dispersion).max(0.0));
        }
    }

    if stabilities.is_empty() {
        return 0.0;
    }
    stabilities.iter().sum::<f32>() / stabilities.len() as f32
}

/// 安定度が許容ばらつき内か（助言表示のみ、自動却下には使わない）
pub fn is_stable(stability: f32, stability_threshold: f32) -> bool {
    stability >= 1.0 - stability_threshold
}

/// 1軸の母標準偏差
fn axis_std(positions: &[[f32; 3]], axis: usize) -> f32 {
    let n = positions.len() as f32;
    let mean = positions.iter().map(|p| p[axis]).sum::<f32>() / n;
    let variance = positions.iter().map(|p| (p[axis] - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn identical_frames(count: usize) -> Vec<Frame> {
        let frame = Frame::new(vec![Landmark::new(0.5, 0.5, 0.0, 1.0); LandmarkIndex::COUNT]);
        vec![frame; count]
    }

    fn noisy_frames(count: usize, amplitude: f32, seed: u64) -> Vec<Frame> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let landmarks = (0..LandmarkIndex::COUNT)
                    .map(|_| {
                        Landmark::new(
                            0.5 + rng.gen_range(-amplitude..amplitude),
                            0.5 + rng.gen_range(-amplitude..amplitude),
                            rng.gen_range(-amplitude..amplitude),
                            1.0,
                        )
                    })
                    .collect();
                Frame::new(landmarks)
            })
            .collect()
    }

    #[test]
    fn test_too_few_frames_returns_zero() {
        assert_eq!(stability_score(&identical_frames(9)), 0.0);
        assert_eq!(stability_score(&[]), 0.0);
    }

    #[test]
    fn test_identical_frames_are_perfectly_stable() {
        let score = stability_score(&identical_frames(40));
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_lowers_stability() {
        let small = stability_score(&noisy_frames(40, 0.05, 7));
        let large = stability_score(&noisy_frames(40, 0.4, 7));
        assert!(small < 1.0);
        assert!(large < small);
    }

    #[test]
    fn test_is_stable_threshold() {
        assert!(is_stable(0.96, 0.05));
        assert!(!is_stable(0.9, 0.05));
    }
}
