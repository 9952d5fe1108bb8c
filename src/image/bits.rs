// Phase 1: ビット順反転（FillOrder=2 の CCITT データ用）

/// バッファ内の各バイトのビット順を反転する（bit0↔bit7, bit1↔bit6, ...）。
///
/// 2回適用すると元に戻る。空バッファはそのまま。
pub fn reverse_bits(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        *b = b.reverse_bits();
    }
}

/// 入力を変更せず、ビット順を反転したコピーを返す。
pub fn reversed(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    reverse_bits(&mut out);
    out
}
