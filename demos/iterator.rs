use rand::{distr::Alphanumeric, rng, Rng};
use seqtrie::trie::TrieString;

fn main() -> seqtrie::Result<()> {
    static POPULATION_SIZE: usize = 10;
    static SIZE: usize = 10;

    // Create our trie and a collection of searches
    let mut trie = TrieString::new();
    let mut searches = vec![];

    // Store 10 random strings (char sequences)
    // composed of between 1 and 10 characters in
    // our search collection and our trie.
    for _i in 0..POPULATION_SIZE {
        let entry: Vec<char> = rng()
            .sample_iter(&Alphanumeric)
            .take(rng().random_range(1..=SIZE))
            .map(char::from)
            .collect();
        searches.push(entry.clone());
        let len = entry.len();
        trie.put(entry, len)?;
    }

    // iterate over our search collection and confirm
    // that all keys are in our search collection
    println!("breadth first");
    for pair in trie.iter() {
        assert!(searches.contains(&pair.key.as_slice().to_vec()));
        println!("key: {}, value: {:?}", pair.key, pair.value);
    }
    println!("sorted");
    for pair in trie.iter_sorted() {
        println!("key: {}, value: {:?}", pair.key, pair.value);
    }

    // Drain the trie smallest key first
    println!("polled");
    while let Some((key, value)) = trie.poll_first_entry()? {
        println!("key: {}, value: {:?}", key, value);
    }
    assert!(trie.is_empty());
    Ok(())
}
