use crate::models::SummaryResponse;

pub fn render_index(summary: &SummaryResponse) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &summary.date)
        .replace("{{TOTAL}}", &summary.total_today.to_string())
        .replace("{{TARGET}}", &summary.goal_target.to_string())
        .replace("{{REMAINING}}", &summary.remaining.to_string())
        .replace("{{WEIGHT}}", &format!("{:.1}", summary.weight))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Calorie Log</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef5ee;
      --bg-2: #cfe8cf;
      --ink: #24302a;
      --accent: #2d7a4b;
      --accent-2: #35524a;
      --warn: #c63b2b;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(53, 82, 74, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3f0e0 60%, #f1f7ee 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5c6a5f;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(53, 82, 74, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7d8a7f;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.remaining {
      color: var(--accent);
    }

    .stat .value.over {
      color: var(--warn);
    }

    form.log-form {
      display: grid;
      grid-template-columns: 2fr 1fr auto;
      gap: 12px;
      align-items: end;
    }

    .field {
      display: grid;
      gap: 6px;
    }

    .field label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7d8a7f;
    }

    input[type="text"],
    input[type="number"] {
      border: 1px solid rgba(53, 82, 74, 0.2);
      border-radius: 12px;
      padding: 12px 14px;
      font-size: 1rem;
      font-family: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-log {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(45, 122, 75, 0.3);
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      align-items: end;
      justify-content: space-between;
      gap: 16px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(53, 82, 74, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #66716a;
      box-shadow: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(53, 82, 74, 0.12);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(53, 82, 74, 0.08);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-ref {
      fill: none;
      stroke-width: 2;
      stroke-dasharray: 6 6;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(53, 82, 74, 0.12);
    }

    .chart-label {
      fill: #79847b;
      font-size: 11px;
    }

    .entries {
      display: grid;
      gap: 8px;
    }

    .entry-row {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      background: white;
      border: 1px solid rgba(53, 82, 74, 0.08);
      border-radius: 14px;
      padding: 10px 16px;
    }

    .entry-row .name {
      flex: 1;
      white-space: pre-wrap;
    }

    .entry-row .cal {
      font-weight: 600;
      color: var(--accent-2);
    }

    .entry-row .when {
      color: #79847b;
      font-size: 0.85rem;
    }

    .entry-row button {
      background: transparent;
      color: var(--warn);
      padding: 6px 10px;
      font-size: 0.9rem;
    }

    .io-row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    .btn-export {
      background: var(--accent-2);
      color: white;
      text-decoration: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      font-size: 0.95rem;
    }

    .status {
      font-size: 0.95rem;
      color: #66716a;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--warn);
    }

    .status[data-type="ok"] {
      color: var(--accent);
    }

    @media (max-width: 640px) {
      form.log-form {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Calorie Log</h1>
      <p class="subtitle">Log what you eat, watch the total against your goal.</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Date</span>
        <span id="date" class="value">{{DATE}}</span>
      </div>
      <div class="stat">
        <span class="label">Today</span>
        <span id="total" class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Goal</span>
        <span id="target" class="value">{{TARGET}}</span>
      </div>
      <div class="stat">
        <span class="label">Remaining</span>
        <span id="remaining" class="value remaining">{{REMAINING}}</span>
      </div>
    </section>

    <form id="log-form" class="log-form">
      <div class="field">
        <label for="name">Food</label>
        <input type="text" id="name" placeholder="e.g. oatmeal with banana" />
      </div>
      <div class="field">
        <label for="calories">Calories</label>
        <input type="number" id="calories" min="0" step="1" required />
      </div>
      <button class="btn-log" type="submit">Log it</button>
    </form>

    <section class="controls">
      <div class="field">
        <label for="weight">Weight (lb)</label>
        <input type="number" id="weight" min="1" step="0.1" value="{{WEIGHT}}" />
      </div>
      <div class="tabs" id="goal-tabs" role="tablist">
        <button class="tab" type="button" data-goal="maintenance" role="tab">Maintain</button>
        <button class="tab" type="button" data-goal="one_lb" role="tab">-1 lb/wk</button>
        <button class="tab" type="button" data-goal="two_lb" role="tab">-2 lb/wk</button>
      </div>
    </section>

    <section class="chart-area">
      <div class="controls">
        <div>
          <h2 id="chart-title">Cumulative intake</h2>
          <p id="chart-subtitle" class="subtitle">Running total with target reference lines.</p>
        </div>
        <div class="tabs" id="chart-tabs" role="tablist">
          <button class="tab active" type="button" data-tab="cumulative" role="tab">Cumulative</button>
          <button class="tab" type="button" data-tab="daily" role="tab">Daily totals</button>
          <button class="tab" type="button" data-tab="rolling" role="tab">7-day average</button>
        </div>
      </div>
      <div class="chart-card">
        <svg id="chart" viewBox="0 0 640 260" aria-label="Calorie chart" role="img"></svg>
      </div>
      <section class="panel">
        <div class="stat">
          <span class="label">Daily average</span>
          <span class="value" id="metric-average">--</span>
        </div>
        <div class="stat">
          <span class="label">Projected / month</span>
          <span class="value" id="metric-projection">--</span>
        </div>
        <div class="stat">
          <span class="label">Days logged</span>
          <span class="value" id="metric-days">--</span>
        </div>
      </section>
    </section>

    <section>
      <h2>Entries</h2>
      <div class="entries" id="entries"></div>
    </section>

    <section class="io-row">
      <a class="btn-export" href="/api/export">Export CSV</a>
      <input type="file" id="import-file" accept=".csv,text/csv" />
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const totalEl = document.getElementById('total');
    const targetEl = document.getElementById('target');
    const remainingEl = document.getElementById('remaining');
    const dateEl = document.getElementById('date');
    const weightEl = document.getElementById('weight');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const chartTitleEl = document.getElementById('chart-title');
    const chartSubtitleEl = document.getElementById('chart-subtitle');
    const entriesEl = document.getElementById('entries');
    const metricAverage = document.getElementById('metric-average');
    const metricProjection = document.getElementById('metric-projection');
    const metricDays = document.getElementById('metric-days');
    const goalTabs = Array.from(document.querySelectorAll('#goal-tabs .tab'));
    const chartTabs = Array.from(document.querySelectorAll('#chart-tabs .tab'));

    let chartData = null;
    let statsData = null;
    let activeChart = 'cumulative';

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const applySummary = (summary) => {
      dateEl.textContent = summary.date;
      totalEl.textContent = summary.total_today;
      targetEl.textContent = summary.goal_target;
      remainingEl.textContent = summary.remaining;
      remainingEl.classList.toggle('over', summary.remaining < 0);
      goalTabs.forEach((button) => {
        button.classList.toggle('active', button.dataset.goal === summary.goal);
      });
    };

    const renderEntries = (entries) => {
      entriesEl.innerHTML = '';
      if (!entries.length) {
        const empty = document.createElement('p');
        empty.className = 'subtitle';
        empty.textContent = 'Nothing logged yet.';
        entriesEl.appendChild(empty);
        return;
      }
      entries.forEach((entry) => {
        const row = document.createElement('div');
        row.className = 'entry-row';

        const name = document.createElement('span');
        name.className = 'name';
        name.textContent = entry.name;

        const when = document.createElement('span');
        when.className = 'when';
        when.textContent = new Date(entry.timestamp).toLocaleString();

        const cal = document.createElement('span');
        cal.className = 'cal';
        cal.textContent = `${entry.calories} kcal`;

        const del = document.createElement('button');
        del.type = 'button';
        del.textContent = 'Remove';
        del.addEventListener('click', () => {
          removeEntry(entry.id).catch((err) => setStatus(err.message, 'error'));
        });

        row.append(name, when, cal, del);
        entriesEl.appendChild(row);
      });
    };

    const renderLineChart = (series, referenceLines) => {
      if (!series.length || series.every((line) => !line.points.length)) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 640;
      const height = 260;
      const paddingX = 52;
      const paddingY = 34;
      const top = 24;

      const values = series.flatMap((line) => line.points.map((p) => p.value))
        .concat((referenceLines || []).map((ref) => ref.value));
      let min = Math.min(...values, 0);
      let max = Math.max(...values, 0);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const count = Math.max(...series.map((line) => line.points.length));
      const range = max - min;
      const xStep = count > 1 ? (width - paddingX * 2) / (count - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const ticks = 4;
      let parts = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        parts += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        parts += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      (referenceLines || []).forEach((ref) => {
        const yPos = y(ref.value);
        parts += `<line class="chart-ref" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" stroke="${ref.color}" />`;
        parts += `<text class="chart-label" x="${width - paddingX + 4}" y="${yPos + 4}">${ref.label}</text>`;
      });

      const labels = series[0].points;
      const labelEvery = labels.length > 8 ? Math.ceil(labels.length / 8) : 1;
      labels.forEach((point, index) => {
        if (index % labelEvery !== 0) {
          return;
        }
        parts += `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.label}</text>`;
      });

      series.forEach((line) => {
        const path = line.points
          .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
          .join(' ');
        parts += `<path class="chart-line" d="${path}" ${line.color ? `stroke="${line.color}"` : ''} />`;
        if (line.points.length <= 40) {
          parts += line.points
            .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="3" />`)
            .join('');
        }
      });

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = parts;
    };

    const renderCumulative = () => {
      chartTitleEl.textContent = 'Cumulative intake';
      chartSubtitleEl.textContent = 'Running total with target reference lines.';
      if (!chartData) {
        return;
      }
      const points = chartData.points.map((p) => ({ label: p.label, value: p.total }));
      renderLineChart(
        [{ points }],
        [
          { value: chartData.maintenance, label: 'maintain', color: '#35524a' },
          { value: chartData.one_lb, label: '-1 lb', color: '#8a9a5b' },
          { value: chartData.two_lb, label: '-2 lb', color: '#c6902b' }
        ]
      );
    };

    const renderDaily = (key) => {
      chartTitleEl.textContent = key === 'rolling' ? '7-day rolling average' : 'Daily totals';
      chartSubtitleEl.textContent = key === 'rolling'
        ? 'Average of the last 7 logged days.'
        : 'Calories per calendar day (UTC).';
      if (!statsData || statsData.status !== 'ready') {
        renderLineChart([], []);
        return;
      }
      const points = statsData.days.map((day) => ({
        label: day.date.slice(5),
        value: key === 'rolling' ? day.rolling_avg : day.total
      }));
      renderLineChart([{ points }], []);
    };

    const renderActiveChart = () => {
      if (activeChart === 'cumulative') {
        renderCumulative();
      } else {
        renderDaily(activeChart);
      }
    };

    const applyStats = () => {
      if (!statsData || statsData.status !== 'ready') {
        metricAverage.textContent = '--';
        metricProjection.textContent = '--';
        metricDays.textContent = '0';
        return;
      }
      metricAverage.textContent = statsData.overall_average;
      const change = statsData.projected_monthly_change;
      const direction = change > 0 ? 'loss' : change < 0 ? 'gain' : 'steady';
      metricProjection.textContent = `${Math.abs(change).toFixed(1)} lb ${direction}`;
      metricDays.textContent = statsData.days.length;
    };

    const api = async (path, options) => {
      const res = await fetch(path, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const refresh = async () => {
      const [summary, entries, chart, stats] = await Promise.all([
        api('/api/summary'),
        api('/api/entries'),
        api('/api/chart'),
        api('/api/stats')
      ]);
      applySummary(summary);
      renderEntries(entries);
      chartData = chart;
      statsData = stats;
      applyStats();
      renderActiveChart();
    };

    const removeEntry = async (id) => {
      const summary = await api(`/api/entries/${id}`, { method: 'DELETE' });
      applySummary(summary);
      await refresh();
    };

    document.getElementById('log-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const name = document.getElementById('name').value;
      const calories = Number(document.getElementById('calories').value);
      api('/api/entries', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ name, calories })
      })
        .then(() => {
          document.getElementById('name').value = '';
          document.getElementById('calories').value = '';
          setStatus('Logged', 'ok');
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    weightEl.addEventListener('change', () => {
      api('/api/weight', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ weight: Number(weightEl.value) })
      })
        .then((summary) => {
          applySummary(summary);
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    goalTabs.forEach((button) => {
      button.addEventListener('click', () => {
        api('/api/goal', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ goal: button.dataset.goal })
        })
          .then((summary) => applySummary(summary))
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    chartTabs.forEach((button) => {
      button.addEventListener('click', () => {
        activeChart = button.dataset.tab;
        chartTabs.forEach((tab) => tab.classList.toggle('active', tab === button));
        renderActiveChart();
      });
    });

    document.getElementById('import-file').addEventListener('change', (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      const reader = new FileReader();
      reader.onload = () => {
        fetch('/api/import', { method: 'POST', body: reader.result })
          .then(async (res) => {
            if (!res.ok) {
              throw new Error(await res.text());
            }
            const result = await res.json();
            setStatus(`Imported ${result.imported} entries`, 'ok');
            return refresh();
          })
          .catch((err) => setStatus(err.message, 'error'));
      };
      reader.readAsText(file);
      event.target.value = '';
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
