use std::io::BufReader;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use seqidx_rust::index::builder::{BuildMethod, SuffixTray, SuffixTrayBuilder};
use seqidx_rust::index::bwt::BwtIndex;
use seqidx_rust::index::qgram::{QGramCoder, QGramIndex};
use seqidx_rust::index::{check, lcp};
use seqidx_rust::io::fasta;
use seqidx_rust::project::{self, Project};
use seqidx_rust::util::alphabet::Alphabet;
use seqidx_rust::util::arrayfile;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "seqidx", author, version, about = "Full-text index builder for coded biological sequences", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a FASTA file into a coded sequence (.seq + .prj)
    Translate {
        /// Input FASTA file
        fasta: String,
        /// Output prefix for all index files
        #[arg(short, long, default_value = "seqidx")]
        output: String,
        /// Alphabet name (dna or numeric)
        #[arg(long, default_value = "dna")]
        alphabet: String,
    },
    /// Build the suffix list and write the pos array (.pos), optionally LCP arrays
    Suffix {
        /// Index prefix (as given to translate)
        prefix: String,
        /// Construction method: L, R, minLR, bothLR or bothLR2
        #[arg(short, long, default_value = "L")]
        method: String,
        /// Write the 4-byte LCP array (.lcp)
        #[arg(long)]
        lcp: bool,
        /// Write the 2-byte LCP array with exception table (.lcp2/.lcp2x)
        #[arg(long)]
        lcp2: bool,
        /// Write the 1-byte LCP array with exception table (.lcp1/.lcp1x)
        #[arg(long)]
        lcp1: bool,
        /// Verify the constructed list before writing
        #[arg(long)]
        check: bool,
        /// Only verify an existing .pos file, build nothing
        #[arg(long)]
        only_check: bool,
    },
    /// Build the q-gram bucket index (.qbck/.qpos/.qfilter)
    Qgram {
        /// Index prefix
        prefix: String,
        /// q-gram length
        #[arg(short, default_value_t = 11)]
        q: usize,
    },
    /// Count query occurrences with the BWT index (builds .bwt on first use)
    Search {
        /// Index prefix
        prefix: String,
        /// Query strings, translated with the project's alphabet
        queries: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Translate {
            fasta,
            output,
            alphabet,
        } => run_translate(&fasta, &output, &alphabet),
        Commands::Suffix {
            prefix,
            method,
            lcp,
            lcp2,
            lcp1,
            check,
            only_check,
        } => {
            let mut dolcp = 0u8;
            if lcp {
                dolcp |= lcp::LCP4;
            }
            if lcp2 {
                dolcp |= lcp::LCP2;
            }
            if lcp1 {
                dolcp |= lcp::LCP1;
            }
            let code = run_suffix(&prefix, method.parse()?, dolcp, check, only_check)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Qgram { prefix, q } => run_qgram(&prefix, q),
        Commands::Search { prefix, queries } => run_search(&prefix, &queries),
    }
}

fn load_alphabet(prj: &Project) -> Result<Alphabet> {
    Alphabet::by_name(&prj.alphabet)
        .with_context(|| format!("unknown alphabet '{}' in project file", prj.alphabet))
}

fn load_text(prefix: &str) -> Result<(Project, Vec<i8>)> {
    let prj = Project::load(&Project::file(prefix, project::EXT_PROJECT))?;
    let text = arrayfile::read_i8_array(&Project::file(prefix, project::EXT_SEQ))?;
    anyhow::ensure!(
        text.len() as u64 == prj.length,
        "sequence length {} does not match project length {}",
        text.len(),
        prj.length
    );
    Ok((prj, text))
}

fn run_translate(fasta_path: &str, output: &str, alphabet_name: &str) -> Result<()> {
    let alphabet = Alphabet::by_name(alphabet_name)
        .with_context(|| format!("unknown alphabet '{alphabet_name}'"))?;
    let fh = std::fs::File::open(fasta_path)
        .with_context(|| format!("cannot open FASTA file '{fasta_path}'"))?;

    let timer = Instant::now();
    let (text, contigs) = fasta::translate(BufReader::new(fh), &alphabet)?;
    println!("translate: {} sequences, {} coded bytes", contigs.len(), text.len());

    arrayfile::write_i8_array(&Project::file(output, project::EXT_SEQ), &text)?;
    let prj = Project::new(output, alphabet.name(), text.len() as u64, contigs);
    prj.save(&Project::file(output, project::EXT_PROJECT))?;
    println!(
        "translate: wrote {}{} and {}{} in {:.2}s",
        output,
        project::EXT_SEQ,
        output,
        project::EXT_PROJECT,
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_suffix(
    prefix: &str,
    method: BuildMethod,
    dolcp: u8,
    do_check: bool,
    only_check: bool,
) -> Result<i32> {
    let (mut prj, text) = load_text(prefix)?;
    let alphabet = load_alphabet(&prj)?;
    let pos_path = Project::file(prefix, project::EXT_POS);

    if only_check {
        let timer = Instant::now();
        let pos = arrayfile::read_i32_array(&pos_path)?;
        let code = check::check_pos(&text, &alphabet, &pos);
        if code == 0 {
            println!("suffixcheck: pos seems OK!");
        }
        println!("suffixcheck: checking took {:.2}s", timer.elapsed().as_secs_f64());
        return Ok(code);
    }

    match text.last() {
        Some(&last) if alphabet.is_special(last) => {}
        _ => anyhow::bail!("coded sequence must end with a wildcard or separator"),
    }

    println!("suffix: building list with method {method}...");
    let timer = Instant::now();
    let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
    let mut tray = builder.build(method);
    println!(
        "suffix: construction took {:.2}s, {} steps",
        timer.elapsed().as_secs_f64(),
        builder.steps()
    );

    if do_check {
        let timer = Instant::now();
        let code = check::check_list(&text, &alphabet, tray.as_list_mut());
        println!("suffix: checking took {:.2}s", timer.elapsed().as_secs_f64());
        if code != 0 {
            return Ok(code);
        }
    }

    let timer = Instant::now();
    tray.write_pos(&pos_path)?;
    println!("suffix: writing took {:.2}s", timer.elapsed().as_secs_f64());

    if dolcp != 0 {
        let dll = match &tray {
            SuffixTray::Explicit(dll) => dll,
            SuffixTray::Xor(_) => {
                anyhow::bail!("lcp arrays are not supported with method bothLR")
            }
        };
        println!("suffix: computing lcp array...");
        let timer = Instant::now();
        let (buf, info) = lcp::compute(&text, &alphabet, dll);
        lcp::write_files(dll, &buf, dolcp, &Project::file(prefix, project::EXT_LCP))?;
        println!(
            "suffix: lcp computation and writing took {:.2}s (max {}, {} / {} exceptions)",
            timer.elapsed().as_secs_f64(),
            info.max_lcp,
            info.lcp1_exceptions,
            info.lcp2_exceptions
        );
        prj.max_lcp = Some(info.max_lcp);
        prj.lcp1_exceptions = Some(info.lcp1_exceptions);
        prj.lcp2_exceptions = Some(info.lcp2_exceptions);
    }

    prj.method = Some(method.to_string());
    prj.steps = Some(builder.steps());
    prj.save(&Project::file(prefix, project::EXT_PROJECT))?;
    Ok(0)
}

fn run_qgram(prefix: &str, q: usize) -> Result<()> {
    let (mut prj, text) = load_text(prefix)?;
    let alphabet = load_alphabet(&prj)?;

    let timer = Instant::now();
    let coder = QGramCoder::new(q, alphabet.asize())?;
    let index = QGramIndex::build(&coder, &text);
    println!(
        "qgram: indexed {} positions into {} buckets ({} nonempty) in {:.2}s",
        index.positions().len(),
        coder.num_qgrams(),
        index.nonempty_buckets().cardinality(),
        timer.elapsed().as_secs_f64()
    );

    index.write_files(
        &Project::file(prefix, project::EXT_QBCK),
        &Project::file(prefix, project::EXT_QPOS),
    )?;
    index
        .nonempty_buckets()
        .write_to_file(&Project::file(prefix, project::EXT_QFILTER))?;

    prj.q = Some(q as u32);
    prj.save(&Project::file(prefix, project::EXT_PROJECT))?;
    Ok(())
}

fn run_search(prefix: &str, queries: &[String]) -> Result<()> {
    let (prj, text) = load_text(prefix)?;
    let alphabet = load_alphabet(&prj)?;

    let bwt_path = Project::file(prefix, project::EXT_BWT);
    let index = if bwt_path.exists() {
        BwtIndex::load_from_file(&bwt_path)?
    } else {
        let pos_path = Project::file(prefix, project::EXT_POS);
        anyhow::ensure!(
            pos_path.exists(),
            "{} not found; run the suffix subcommand first",
            pos_path.display()
        );
        let timer = Instant::now();
        let pos = arrayfile::read_i32_array(&pos_path)?;
        let index = BwtIndex::from_pos(&pos, &text);
        index.save_to_file(&bwt_path)?;
        println!(
            "search: built and saved {} in {:.2}s",
            bwt_path.display(),
            timer.elapsed().as_secs_f64()
        );
        index
    };

    for query in queries {
        let coded: Vec<i8> = query.bytes().map(|b| alphabet.encode(b)).collect();
        println!("{}: {} occurrences", query, index.find(&coded));
    }
    Ok(())
}
