use seqtrie::trie::UncompressedTrie;
use unicode_segmentation::UnicodeSegmentation;

fn main() -> seqtrie::Result<()> {
    // Create our trie
    let mut trie = UncompressedTrie::new();

    // Insert some graphemes
    let s = "a̐éö̲\r\n";
    let input = s.graphemes(true);
    let count = input.clone().count();
    trie.put(input.clone(), count)?;
    assert!(trie.contains_key(input.clone())?);
    assert!(trie.contains_prefix(s.graphemes(true).take(2))?);
    assert_eq!(trie.get(input)?, Some(&count));
    Ok(())
}
