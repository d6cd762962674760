/// 算術平均
/// mean(a) = Σ(a_i) / n
///
/// # Returns
/// * `None` - 空のスライス
#[inline]
pub fn mean<N>(vals: &[N]) -> Option<f64>
where
    N: Copy + Into<f64>,
{
    if vals.is_empty() {
        return None;
    }
    let sum: f64 = vals.iter().map(|&v| v.into()).sum();
    Some(sum / vals.len() as f64)
}

/// ピアソンの積率相関係数
/// r = Σ((a_i - ā)(b_i - b̄)) / sqrt(Σ(a_i - ā)^2 * Σ(b_i - b̄)^2)
///
/// `a[i]` and `b[i]` must describe the same counterpart.
///
/// # Returns
/// * `Some(r)` - r in [-1, 1]
/// * `None` - undefined: empty input, length mismatch, zero variance or non-finite values
pub fn pearson<N>(a: &[N], b: &[N]) -> Option<f64>
where
    N: Copy + Into<f64>,
{
    if a.len() != b.len() {
        return None;
    }
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;

    let mut cov = 0_f64;
    let mut ss_a = 0_f64;
    let mut ss_b = 0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x.into() - mean_a;
        let dy = y.into() - mean_b;
        cov += dx * dy;
        ss_a += dx * dx;
        ss_b += dy * dy;
    }

    // 分散ゼロ (定数ベクトル) は相関が定義されない
    if !(ss_a > 0.0 && ss_b > 0.0) {
        return None;
    }
    let r = cov / (ss_a * ss_b).sqrt();
    if !r.is_finite() {
        return None;
    }
    Some(r.clamp(-1.0, 1.0))
}
